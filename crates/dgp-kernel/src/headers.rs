// headers.rs — HeaderChecker (§4.1).
//
// Tests presence of required section headings in the output. A heading is
// present if it appears verbatim as a substring, or as a heading-style
// line (`Heading:` with optional whitespace before the colon).

use regex::RegexBuilder;

use crate::numeric::round_half_up;

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCheck {
    pub compliant: bool,
    pub missing: Vec<String>,
    pub found: Vec<String>,
    /// Percentage in `[0, 100]`, rounded half-up; 100 if `required` is empty.
    pub coverage: i64,
}

/// The kernel always configures the checker with `strict = false,
/// case_sensitive = false`; both remain parameters so the contract matches
/// spec.md's general-purpose checker.
pub fn check(required: &[String], output: &str, strict: bool, case_sensitive: bool) -> HeaderCheck {
    let mut found = Vec::new();
    let mut missing = Vec::new();

    for heading in required {
        if is_present(heading, output, case_sensitive) {
            found.push(heading.clone());
        } else {
            missing.push(heading.clone());
        }
    }

    let coverage = if required.is_empty() {
        100
    } else {
        round_half_up(found.len() as f64 / required.len() as f64 * 100.0)
    };

    let compliant = if strict { missing.is_empty() } else { !found.is_empty() };

    HeaderCheck { compliant, missing, found, coverage }
}

fn is_present(heading: &str, output: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        if output.contains(heading) {
            return true;
        }
    } else if output.to_lowercase().contains(&heading.to_lowercase()) {
        return true;
    }

    let pattern = format!(r"{}\s*:", regex::escape(heading));
    let Ok(re) = RegexBuilder::new(&pattern).case_insensitive(!case_sensitive).build() else {
        return false;
    };
    re.is_match(output)
}
