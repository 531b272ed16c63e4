//! Resolution of free-text job locations to US state names.

/// Checked in order by lowercase substring, before the abbreviation suffix.
const CITY_TO_STATE: &[(&str, &str)] = &[
    ("atlanta", "Georgia"),
    ("boston", "Massachusetts"),
    ("chicago", "Illinois"),
    ("new york", "New York"),
    ("los angeles", "California"),
    ("san francisco", "California"),
    ("washington, d.c.", "District of Columbia"),
    ("washington d.c.", "District of Columbia"),
    ("washington, dc", "District of Columbia"),
    ("washington dc", "District of Columbia"),
    ("houston", "Texas"),
    ("dallas", "Texas"),
    ("austin", "Texas"),
    ("miami", "Florida"),
    ("philadelphia", "Pennsylvania"),
    ("seattle", "Washington"),
    ("denver", "Colorado"),
    ("palo alto", "California"),
    ("silicon valley", "California"),
    ("charlotte", "North Carolina"),
    ("minneapolis", "Minnesota"),
    ("detroit", "Michigan"),
    ("nashville", "Tennessee"),
    ("phoenix", "Arizona"),
];

const ABBREVIATIONS: &[(&str, &str)] = &[
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("DC", "District of Columbia"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

/// Resolves a location such as `"Atlanta, GA"` or `"Remote, TX"` to a state
/// name. Returns `None` when neither a known city nor a trailing `", XX"`
/// abbreviation is present.
pub fn resolve_state(location: &str) -> Option<&'static str> {
    if location.is_empty() {
        return None;
    }

    let lower = location.to_lowercase();
    if let Some((_, state)) = CITY_TO_STATE.iter().find(|(city, _)| lower.contains(city)) {
        return Some(*state);
    }

    let abbr = trailing_abbreviation(location)?;
    ABBREVIATIONS
        .iter()
        .find(|(code, _)| *code == abbr)
        .map(|(_, state)| *state)
}

/// The two uppercase letters of a `", XX"` suffix (whitespace allowed after
/// the comma, nothing allowed after the letters).
fn trailing_abbreviation(location: &str) -> Option<&str> {
    let (_, tail) = location.rsplit_once(',')?;
    let code = tail.trim_start();
    (code.len() == 2 && code.bytes().all(|b| b.is_ascii_uppercase())).then_some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_lookup() {
        assert_eq!(resolve_state("Atlanta"), Some("Georgia"));
        assert_eq!(resolve_state("Downtown ATLANTA office"), Some("Georgia"));
        assert_eq!(resolve_state("Washington, DC"), Some("District of Columbia"));
        assert_eq!(resolve_state("San Francisco / Palo Alto"), Some("California"));
    }

    #[test]
    fn test_washington_state_is_not_the_district() {
        assert_eq!(resolve_state("Washington D.C."), Some("District of Columbia"));
        assert_eq!(resolve_state("Washington DC / Remote"), Some("District of Columbia"));
        assert_eq!(resolve_state("Seattle, Washington"), Some("Washington"));
        assert_eq!(resolve_state("Spokane, WA"), Some("Washington"));
        assert_eq!(resolve_state("Spokane, Washington"), None);
    }

    #[test]
    fn test_city_wins_over_abbreviation() {
        // table order decides, abbreviation is only a fallback
        assert_eq!(resolve_state("Boston, NY"), Some("Massachusetts"));
    }

    #[test]
    fn test_abbreviation_suffix() {
        assert_eq!(resolve_state("Savannah, GA"), Some("Georgia"));
        assert_eq!(resolve_state("Savannah,GA"), Some("Georgia"));
        assert_eq!(resolve_state("Tacoma, WA"), Some("Washington"));
        assert_eq!(resolve_state("Wilmington, DE"), Some("Delaware"));
    }

    #[test]
    fn test_unresolvable_locations() {
        assert_eq!(resolve_state(""), None);
        assert_eq!(resolve_state("Remote"), None);
        assert_eq!(resolve_state("Savannah, ga"), None);
        assert_eq!(resolve_state("Savannah, GA "), None);
        assert_eq!(resolve_state("Savannah, GAX"), None);
        assert_eq!(resolve_state("Somewhere, ZZ"), None);
        assert_eq!(resolve_state("GA"), None);
    }
}
