use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Student;
use crate::utils::{contains_ignore_case, eq_ignore_case};

// ============================================================================
// Filtering
// ============================================================================

/// Active list predicate. Absent or empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct StudentFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(rename = "searchTerm", default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
}

/// Field selector for updating one part of a `StudentFilter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Course,
    SearchTerm,
}

impl StudentFilter {
    pub fn by_course(course: impl Into<String>) -> Self {
        Self {
            course: Some(course.into()),
            search_term: None,
        }
    }

    pub fn by_search(term: impl Into<String>) -> Self {
        Self {
            course: None,
            search_term: Some(term.into()),
        }
    }

    /// Set one field. An empty value clears the constraint.
    pub fn set(&mut self, field: FilterField, value: impl Into<String>) {
        let value = value.into();
        let value = if value.is_empty() { None } else { Some(value) };
        match field {
            FilterField::Course => self.course = value,
            FilterField::SearchTerm => self.search_term = value,
        }
    }

    fn course(&self) -> Option<&str> {
        self.course.as_deref().filter(|c| !c.is_empty())
    }

    fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref().filter(|t| !t.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.course().is_none() && self.search_term().is_none()
    }

    /// Course is an exact case-insensitive match; the search term is a
    /// case-insensitive substring of name or email. Both must hold.
    pub fn matches(&self, student: &Student) -> bool {
        if let Some(course) = self.course() {
            if !eq_ignore_case(&student.course, course) {
                return false;
            }
        }
        if let Some(term) = self.search_term() {
            let term = term.to_lowercase();
            if !contains_ignore_case(&student.name, &term)
                && !contains_ignore_case(&student.email, &term)
            {
                return false;
            }
        }
        true
    }
}

// ============================================================================
// Sorting
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    #[default]
    Name,
    Course,
    Year,
}

impl SortColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::Name => "name",
            SortColumn::Course => "course",
            SortColumn::Year => "year",
        }
    }

    fn compare(&self, a: &Student, b: &Student) -> Ordering {
        match self {
            SortColumn::Name => a.name.cmp(&b.name),
            SortColumn::Course => a.course.cmp(&b.course),
            SortColumn::Year => a.year.cmp(&b.year),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(SortColumn::Name),
            "course" => Ok(SortColumn::Course),
            "year" => Ok(SortColumn::Year),
            other => Err(format!("unknown sort column: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(&self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct SortSpec {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Resolve a sort request against the current ordering: re-requesting the
    /// active column without a direction flips it, a new column starts
    /// ascending, and an explicit direction always wins.
    pub fn request(&self, column: SortColumn, direction: Option<SortDirection>) -> Self {
        let direction = match direction {
            Some(d) => d,
            None if column == self.column => self.direction.toggled(),
            None => SortDirection::Ascending,
        };
        Self { column, direction }
    }

    /// Stable in both directions: equal keys keep their input order.
    pub fn sort(&self, students: &mut [Student]) {
        students.sort_by(|a, b| {
            let cmp = self.column.compare(a, b);
            match self.direction {
                SortDirection::Ascending => cmp,
                SortDirection::Descending => cmp.reverse(),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: &str, name: &str, email: &str, course: &str, year: u8) -> Student {
        Student {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            course: course.to_string(),
            year,
            photo_url: String::new(),
            notes: String::new(),
        }
    }

    fn ids(students: &[Student]) -> Vec<&str> {
        students.iter().map(|s| s.id.as_str()).collect()
    }

    // -------------------------------------------------------------------------
    // Filter Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_empty_filter_matches_all() {
        let filter = StudentFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&student("1", "Alice", "a@x.com", "Arts", 1)));

        let blank = StudentFilter {
            course: Some(String::new()),
            search_term: Some(String::new()),
        };
        assert!(blank.is_empty());
        assert!(blank.matches(&student("1", "Alice", "a@x.com", "Arts", 1)));
    }

    #[test]
    fn test_course_filter_is_case_insensitive_exact() {
        let filter = StudentFilter::by_course("arts");
        assert!(filter.matches(&student("1", "Alice", "a@x.com", "Arts", 1)));
        assert!(!filter.matches(&student("2", "Bob", "b@x.com", "Liberal Arts", 1)));
    }

    #[test]
    fn test_search_matches_name_or_email() {
        let filter = StudentFilter::by_search("WONDER");
        assert!(filter.matches(&student("1", "Alice Wonderland", "a@x.com", "Arts", 1)));
        assert!(filter.matches(&student("2", "Al", "wonder@x.com", "Arts", 1)));
        assert!(!filter.matches(&student("3", "Bob", "b@x.com", "Arts", 1)));
    }

    #[test]
    fn test_course_and_search_are_anded() {
        let filter = StudentFilter {
            course: Some("Arts".to_string()),
            search_term: Some("ed".to_string()),
        };
        assert!(filter.matches(&student("5", "Edward", "e@x.com", "Arts", 1)));
        assert!(!filter.matches(&student("6", "Edward", "e@x.com", "Business", 1)));
        assert!(!filter.matches(&student("3", "Charlie", "c@x.com", "Arts", 4)));
    }

    #[test]
    fn test_set_field_empty_clears() {
        let mut filter = StudentFilter::default();
        filter.set(FilterField::Course, "Arts");
        filter.set(FilterField::SearchTerm, "al");
        assert_eq!(filter.course.as_deref(), Some("Arts"));
        assert_eq!(filter.search_term.as_deref(), Some("al"));

        filter.set(FilterField::Course, "");
        assert_eq!(filter.course, None);
        assert_eq!(filter.search_term.as_deref(), Some("al"));
    }

    #[test]
    fn test_filter_json_uses_search_term_key() {
        let json = serde_json::to_value(StudentFilter::by_search("al")).unwrap();
        assert_eq!(json["searchTerm"], "al");
    }

    // -------------------------------------------------------------------------
    // Sort Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_request_toggles_same_column() {
        let spec = SortSpec::default();
        let toggled = spec.request(SortColumn::Name, None);
        assert_eq!(toggled.direction, SortDirection::Descending);
        assert_eq!(toggled.request(SortColumn::Name, None).direction, SortDirection::Ascending);
    }

    #[test]
    fn test_request_new_column_defaults_ascending() {
        let spec = SortSpec::new(SortColumn::Name, SortDirection::Descending);
        let next = spec.request(SortColumn::Year, None);
        assert_eq!(next, SortSpec::new(SortColumn::Year, SortDirection::Ascending));
    }

    #[test]
    fn test_request_explicit_direction_wins() {
        let spec = SortSpec::default();
        let next = spec.request(SortColumn::Name, Some(SortDirection::Ascending));
        assert_eq!(next.direction, SortDirection::Ascending);
    }

    #[test]
    fn test_sort_year_is_numeric() {
        let mut list = vec![
            student("a", "A", "a@x", "X", 5),
            student("b", "B", "b@x", "X", 1),
            student("c", "C", "c@x", "X", 3),
        ];
        SortSpec::new(SortColumn::Year, SortDirection::Ascending).sort(&mut list);
        assert_eq!(ids(&list), vec!["b", "c", "a"]);
        SortSpec::new(SortColumn::Year, SortDirection::Descending).sort(&mut list);
        assert_eq!(ids(&list), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_sort_is_stable_both_directions() {
        let base = vec![
            student("1", "A", "a@x", "Arts", 4),
            student("2", "B", "b@x", "Business", 3),
            student("3", "C", "c@x", "Arts", 1),
            student("4", "D", "d@x", "Business", 2),
        ];

        let mut asc = base.clone();
        SortSpec::new(SortColumn::Course, SortDirection::Ascending).sort(&mut asc);
        assert_eq!(ids(&asc), vec!["1", "3", "2", "4"]);

        let mut desc = base.clone();
        SortSpec::new(SortColumn::Course, SortDirection::Descending).sort(&mut desc);
        assert_eq!(ids(&desc), vec!["2", "4", "1", "3"]);
    }

    #[test]
    fn test_sort_twice_equals_sort_once() {
        let mut once = vec![
            student("1", "Bob", "b@x", "Arts", 2),
            student("2", "alice", "a@x", "Arts", 2),
            student("3", "Alice", "c@x", "Arts", 2),
            student("4", "Bob", "d@x", "Arts", 2),
        ];
        let spec = SortSpec::new(SortColumn::Name, SortDirection::Ascending);
        spec.sort(&mut once);
        let mut twice = once.clone();
        spec.sort(&mut twice);
        assert_eq!(once, twice);
        // Lexical ordering: uppercase sorts before lowercase
        assert_eq!(ids(&once), vec!["3", "1", "4", "2"]);
    }

    #[test]
    fn test_sort_column_parse_and_display() {
        assert_eq!("Year".parse::<SortColumn>().unwrap(), SortColumn::Year);
        assert!("grade".parse::<SortColumn>().is_err());
        assert_eq!(SortColumn::Course.to_string(), "course");
    }
}
