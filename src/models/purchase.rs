use serde::{Deserialize, Serialize};

use super::Course;

/// A course owned by the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    #[serde(rename = "_id")]
    pub id: String,
    /// `None` when the referenced course has been soft-deleted; such records
    /// are dropped before display.
    #[serde(rename = "course_id")]
    pub course: Option<Course>,
    /// Completion percentage (0-100). The fetch path never populates this.
    #[serde(default)]
    pub progress: Option<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tolerates_a_null_course_reference() {
        let record: PurchaseRecord = serde_json::from_value(json!({
            "_id": "p1",
            "course_id": null
        }))
        .unwrap();
        assert!(record.course.is_none());
        assert!(record.progress.is_none());
    }

    #[test]
    fn carries_the_embedded_course() {
        let record: PurchaseRecord = serde_json::from_value(json!({
            "_id": "p2",
            "course_id": {
                "_id": "c1",
                "title": "Prelims Crash Course",
                "description": "fast-track",
                "language": "English",
                "thumbnail": "https://cdn.learnhub.example/thumbs/prelims.png",
                "price": 500,
                "createdAt": "2024-03-15T00:00:00.000Z"
            },
            "progress": 40
        }))
        .unwrap();
        assert_eq!(record.course.unwrap().title, "Prelims Crash Course");
        assert_eq!(record.progress, Some(40));
    }
}
