use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::text;

/// A purchasable unit of educational content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    /// HTML-encoded rich text exactly as delivered by the API.
    pub description: String,
    pub language: String,
    pub thumbnail: String,
    /// Price in whole currency units.
    pub price: i64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub modules: Vec<CourseModule>,
}

impl Course {
    /// Description decoded to plain text for display.
    pub fn plain_description(&self) -> String {
        text::html_to_plain_text(&self.description)
    }

    /// Creation date rendered the way the portal displays it.
    pub fn created_on(&self) -> String {
        self.created_at.format("%d-%m-%Y").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseModule {
    #[serde(rename = "moduleTitle")]
    pub module_title: String,
    #[serde(default)]
    pub videos: Vec<Video>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "videoTitle", default)]
    pub video_title: Option<String>,
    /// The wire format carries no lock flag; playback is gated elsewhere and
    /// every video in this view is locked.
    #[serde(default = "locked_default")]
    pub locked: bool,
}

fn locked_default() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn course_json() -> serde_json::Value {
        json!({
            "_id": "66a1c0ffee",
            "title": "Mains Answer Writing",
            "description": "&lt;p&gt;PYQ &amp; strategy&lt;/p&gt;",
            "language": "Hindi",
            "thumbnail": "https://cdn.learnhub.example/thumbs/mains.png",
            "price": 1000,
            "createdAt": "2024-06-01T09:30:00.000Z",
            "modules": [
                {
                    "moduleTitle": "Introduction",
                    "videos": [
                        { "_id": "v1", "videoTitle": "Orientation" },
                        { "_id": "v2" }
                    ]
                }
            ]
        })
    }

    #[test]
    fn deserializes_the_wire_shape() {
        let course: Course = serde_json::from_value(course_json()).unwrap();
        assert_eq!(course.id, "66a1c0ffee");
        assert_eq!(course.price, 1000);
        assert_eq!(course.modules.len(), 1);
        assert_eq!(course.modules[0].videos[0].video_title.as_deref(), Some("Orientation"));
        assert_eq!(course.modules[0].videos[1].video_title, None);
    }

    #[test]
    fn videos_are_locked_by_default() {
        let course: Course = serde_json::from_value(course_json()).unwrap();
        assert!(course.modules[0].videos.iter().all(|v| v.locked));
    }

    #[test]
    fn plain_description_decodes_and_strips() {
        let course: Course = serde_json::from_value(course_json()).unwrap();
        assert_eq!(course.plain_description(), "PYQ & strategy");
    }

    #[test]
    fn created_on_uses_day_month_year() {
        let course: Course = serde_json::from_value(course_json()).unwrap();
        assert_eq!(course.created_on(), "01-06-2024");
    }

    #[test]
    fn missing_modules_default_to_empty() {
        let mut value = course_json();
        value.as_object_mut().unwrap().remove("modules");
        let course: Course = serde_json::from_value(value).unwrap();
        assert!(course.modules.is_empty());
    }
}
