use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::NavigationError;

/// Where to put the caret. All values are 0-based; offsets count chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    LineColumn { line: usize, column: usize },
    Offset(usize),
}

impl Location {
    pub fn line_column(line: usize, column: usize) -> Self {
        Location::LineColumn { line, column }
    }

    /// Build a location from loose request fields. Exactly one form must be given.
    pub fn from_parts(
        line: Option<usize>,
        column: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Self, NavigationError> {
        match (line, column, offset) {
            (Some(line), Some(column), None) => Ok(Location::LineColumn { line, column }),
            (None, None, Some(offset)) => Ok(Location::Offset(offset)),
            (None, None, None) => Err(NavigationError::InvalidArgument(
                "location needs either line and column or an offset".into(),
            )),
            (_, _, Some(_)) => Err(NavigationError::InvalidArgument(
                "location has both line/column and offset".into(),
            )),
            _ => Err(NavigationError::InvalidArgument(
                "line and column must be given together".into(),
            )),
        }
    }
}

// path:LINE[:COL] (1-based, as compilers print them) or path#OFFSET (0-based)
static TARGET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<path>.+?)(?::(?P<line>\d+)(?::(?P<col>\d+))?|#(?P<offset>\d+))$")
        .expect("static regex")
});

/// Parse `src/main.rs:12:5`, `src/main.rs:12` or `src/main.rs#340`.
pub fn parse_target(target: &str) -> Result<(PathBuf, Location), NavigationError> {
    let invalid = || NavigationError::InvalidArgument(format!("unrecognised target '{}'", target));

    let caps = TARGET_RE.captures(target.trim()).ok_or_else(invalid)?;
    let number = |name: &str| -> Result<Option<usize>, NavigationError> {
        caps.name(name)
            .map(|m| m.as_str().parse::<usize>().map_err(|_| invalid()))
            .transpose()
    };

    let path = PathBuf::from(&caps["path"]);
    if let Some(offset) = number("offset")? {
        return Ok((path, Location::Offset(offset)));
    }

    let line = number("line")?.ok_or_else(invalid)?;
    let col = number("col")?.unwrap_or(1);
    if line == 0 || col == 0 {
        return Err(NavigationError::InvalidArgument(format!(
            "line and column in '{}' are 1-based",
            target
        )));
    }

    Ok((path, Location::line_column(line - 1, col - 1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn exactly_one_form_is_accepted() {
        assert_eq!(
            Location::from_parts(Some(3), Some(5), None).unwrap(),
            Location::line_column(3, 5)
        );
        assert_eq!(Location::from_parts(None, None, Some(42)).unwrap(), Location::Offset(42));

        for (line, column, offset) in [
            (None, None, None),
            (Some(1), Some(1), Some(1)),
            (Some(1), None, None),
            (None, Some(1), None),
            (Some(1), None, Some(4)),
        ] {
            let err = Location::from_parts(line, column, offset).unwrap_err();
            assert!(matches!(err, NavigationError::InvalidArgument(_)));
        }
    }

    #[test]
    fn parses_compiler_style_targets() {
        assert_eq!(
            parse_target("src/lib.rs:12:5").unwrap(),
            (PathBuf::from("src/lib.rs"), Location::line_column(11, 4))
        );
        assert_eq!(
            parse_target("notes.txt:3").unwrap(),
            (PathBuf::from("notes.txt"), Location::line_column(2, 0))
        );
        assert_eq!(
            parse_target("C:/work/a.txt#42").unwrap(),
            (PathBuf::from("C:/work/a.txt"), Location::Offset(42))
        );
    }

    #[test]
    fn rejects_malformed_targets() {
        assert!(parse_target("notes.txt").is_err());
        assert!(parse_target("notes.txt:0:1").is_err());
        assert!(parse_target(":3").is_err());
        assert!(parse_target("a.txt:99999999999999999999999").is_err());
    }
}
