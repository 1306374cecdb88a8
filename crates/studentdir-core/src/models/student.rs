use rand::Rng;
use serde::{Deserialize, Serialize};

/// Base URL for generated avatar placeholders
const PLACEHOLDER_PHOTO_BASE: &str = "https://i.pravatar.cc/150?img=";

/// Number of distinct placeholder avatars the provider serves.
const PLACEHOLDER_PHOTO_COUNT: u32 = 70;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: String,
    pub course: String,
    pub year: u8,
    #[serde(rename = "photoUrl", default)]
    pub photo_url: String,
    #[serde(default)]
    pub notes: String,
}

impl Student {
    pub fn display_year(&self) -> String {
        format!("Year {}", self.year)
    }

    pub fn has_notes(&self) -> bool {
        !self.notes.is_empty()
    }
}

/// Input for creating a student. The service assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub course: String,
    pub year: u8,
    #[serde(rename = "photoUrl", default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewStudent {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        course: impl Into<String>,
        year: u8,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            course: course.into(),
            year,
            photo_url: None,
            notes: None,
        }
    }

    pub fn with_photo_url(mut self, url: impl Into<String>) -> Self {
        self.photo_url = Some(url.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Build the stored record, filling defaults for absent optional fields.
    /// An empty string counts as absent.
    pub fn into_student(self, id: String) -> Student {
        let photo_url = self
            .photo_url
            .filter(|url| !url.is_empty())
            .unwrap_or_else(placeholder_photo_url);
        let notes = self.notes.unwrap_or_default();

        Student {
            id,
            name: self.name,
            email: self.email,
            course: self.course,
            year: self.year,
            photo_url,
            notes,
        }
    }
}

/// Partial update. Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct StudentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u8>,
    #[serde(rename = "photoUrl", default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl StudentPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.course.is_none()
            && self.year.is_none()
            && self.photo_url.is_none()
            && self.notes.is_none()
    }

    /// Merge the supplied fields over `student`.
    pub fn apply_to(self, student: &mut Student) {
        if let Some(name) = self.name {
            student.name = name;
        }
        if let Some(email) = self.email {
            student.email = email;
        }
        if let Some(course) = self.course {
            student.course = course;
        }
        if let Some(year) = self.year {
            student.year = year;
        }
        if let Some(photo_url) = self.photo_url {
            student.photo_url = photo_url;
        }
        if let Some(notes) = self.notes {
            student.notes = notes;
        }
    }
}

/// Generate a random avatar URL for students created without a photo.
pub fn placeholder_photo_url() -> String {
    let n = rand::thread_rng().gen_range(1..=PLACEHOLDER_PHOTO_COUNT);
    format!("{}{}", PLACEHOLDER_PHOTO_BASE, n)
}
