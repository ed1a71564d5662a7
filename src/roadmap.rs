use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::ir::{CourseData, Edge, Graph, Node, Position};

const COLUMN_PITCH: f32 = 250.0;
const YEAR_PITCH: f32 = 150.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Roadmap {
    pub id: String,
    pub title: String,
    pub major: String,
    pub version: String,
    pub track: String,
    pub course_ids: Vec<String>,
    pub dual_studies: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub credit_hours: f32,
    pub prerequisites: Vec<String>,
    pub corequisites: Vec<String>,
    pub category: String,
    pub year: Option<u32>,
}

/// Roadmaps plus the course catalog they reference.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RoadmapBundle {
    pub roadmaps: Vec<Roadmap>,
    pub courses: HashMap<String, Course>,
}

impl RoadmapBundle {
    pub fn roadmap(&self, id: &str) -> Option<&Roadmap> {
        self.roadmaps.iter().find(|roadmap| roadmap.id == id)
    }
}

fn course_data(course: &Course) -> CourseData {
    CourseData {
        name: Some(course.name.clone()),
        credit_hours: Some(course.credit_hours),
        category: (!course.category.is_empty()).then(|| course.category.clone()),
        prerequisites: course.prerequisites.clone(),
        corequisites: course.corequisites.clone(),
        year: course.year,
        corequisite_role: None,
    }
}

/// Turns a roadmap into a course graph ready for layout. Ids missing from the
/// catalog are skipped; positions are a rough year-based grid.
pub fn build_course_graph(roadmap: &Roadmap, courses: &HashMap<String, Course>) -> Graph {
    let in_roadmap: HashSet<&str> = roadmap.course_ids.iter().map(String::as_str).collect();
    let mut graph = Graph::new();

    for (index, course_id) in roadmap.course_ids.iter().enumerate() {
        let Some(course) = courses.get(course_id) else {
            tracing::debug!(course = %course_id, roadmap = %roadmap.id, "course not in catalog");
            continue;
        };
        let year = course.year.filter(|year| *year > 0).unwrap_or(1);
        let mut node = Node::new(course_id);
        node.data = course_data(course);
        node.position = Some(Position::new(
            (index % 3) as f32 * COLUMN_PITCH,
            year as f32 * YEAR_PITCH,
        ));
        graph.nodes.push(node);
    }

    let mut linked: HashSet<(&str, &str)> = HashSet::new();
    for course_id in &roadmap.course_ids {
        let Some(course) = courses.get(course_id) else {
            continue;
        };
        for prereq in &course.prerequisites {
            if prereq.is_empty() || !in_roadmap.contains(prereq.as_str()) {
                continue;
            }
            graph.edges.push(Edge::prerequisite(prereq, course_id));
        }
        for coreq in &course.corequisites {
            if coreq.is_empty() || coreq == course_id || !in_roadmap.contains(coreq.as_str()) {
                continue;
            }
            let key = if course_id.as_str() < coreq.as_str() {
                (course_id.as_str(), coreq.as_str())
            } else {
                (coreq.as_str(), course_id.as_str())
            };
            if linked.insert(key) {
                graph.edges.push(Edge::corequisite(course_id, coreq));
            }
        }
    }

    graph
}

/// Case-insensitive search over title, major, track and version.
pub fn filter_roadmaps<'a>(roadmaps: &'a [Roadmap], term: &str) -> Vec<&'a Roadmap> {
    let needle = term.trim().to_lowercase();
    roadmaps
        .iter()
        .filter(|roadmap| {
            needle.is_empty()
                || [
                    &roadmap.title,
                    &roadmap.major,
                    &roadmap.track,
                    &roadmap.version,
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}
