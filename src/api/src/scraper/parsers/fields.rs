//! Cell-level parsing rules shared by the category extractors.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use crate::scraper::country_name;

/// Placeholders the engine prints instead of a value
const MISSING: [&str; 6] = ["", "-", "DNB", "TDNB", "absent", "sub"];

fn player_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.+?)\s*\(([^)]+)\)$").expect("valid player regex"))
}

fn score_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)(?:/(\d+))?(d)?$").expect("valid score regex"))
}

/// Team total as printed in the Score column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub runs: u32,
    pub wickets: u8,
    pub declared: bool,
}

/// Cell text, or `None` for a placeholder
pub fn value(cell: &str) -> Option<&str> {
    let cell = cell.trim();
    if MISSING.iter().any(|m| m.eq_ignore_ascii_case(cell)) {
        None
    } else {
        Some(cell)
    }
}

/// "v Australia" -> "Australia"
pub fn opposition(cell: &str) -> Option<String> {
    let text = value(cell)?;
    let name = text
        .strip_prefix("v ")
        .or_else(|| text.strip_prefix("v. "))
        .unwrap_or(text)
        .trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// "V Kohli (IND)" -> ("V Kohli", Some("India"))
///
/// Multi-team codes such as "ICC/SA" keep the last code.
pub fn player_and_team(cell: &str) -> Option<(String, Option<String>)> {
    let text = value(cell)?;
    match player_re().captures(text) {
        Some(caps) => {
            let code = caps[2].rsplit('/').next().unwrap_or(&caps[2]).trim();
            Some((caps[1].trim().to_string(), Some(country_name(code).to_string())))
        }
        None => Some((text.to_string(), None)),
    }
}

/// "345/6d" -> 345 for 6, declared; a bare total means all out
pub fn score(cell: &str) -> Option<Score> {
    let caps = score_re().captures(value(cell)?)?;
    let runs = caps[1].parse().ok()?;
    let wickets = match caps.get(2) {
        Some(w) => w.as_str().parse().ok()?,
        None => 10,
    };
    Some(Score {
        runs,
        wickets,
        declared: caps.get(3).is_some(),
    })
}

/// "123*" -> (123, not out)
pub fn runs(cell: &str) -> Option<(u32, bool)> {
    let text = value(cell)?;
    match text.strip_suffix('*') {
        Some(digits) => Some((digits.trim().parse().ok()?, true)),
        None => Some((text.parse().ok()?, false)),
    }
}

/// Overs in balls-notation to true overs: "5.2" -> 5 + 2/6
pub fn overs(cell: &str) -> Option<f64> {
    let text = value(cell)?;
    let (whole, balls) = match text.split_once('.') {
        Some((w, b)) => (w.parse::<u32>().ok()?, b.parse::<u32>().ok()?),
        None => (text.parse::<u32>().ok()?, 0),
    };
    if balls >= 6 {
        return None;
    }
    Some(whole as f64 + balls as f64 / 6.0)
}

/// "13 Aug 2022" (or ISO "2022-08-13")
pub fn date(cell: &str) -> Option<NaiveDate> {
    let text = value(cell)?;
    NaiveDate::parse_from_str(text, "%d %b %Y")
        .or_else(|_| NaiveDate::parse_from_str(text, "%Y-%m-%d"))
        .ok()
}

pub fn uint(cell: &str) -> Option<u32> {
    value(cell)?.parse().ok()
}

pub fn int(cell: &str) -> Option<i32> {
    value(cell)?.parse().ok()
}

pub fn float(cell: &str) -> Option<f64> {
    value(cell)?.parse().ok()
}

pub fn innings(cell: &str) -> Option<u8> {
    value(cell)?.parse::<u8>().ok().filter(|n| (1..=4).contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders() {
        for cell in ["", " - ", "DNB", "TDNB", "absent", "sub"] {
            assert_eq!(value(cell), None, "{cell:?}");
        }
        assert_eq!(value(" 42 "), Some("42"));
    }

    #[test]
    fn test_opposition() {
        assert_eq!(opposition("v Australia").as_deref(), Some("Australia"));
        assert_eq!(opposition("West Indies").as_deref(), Some("West Indies"));
        assert_eq!(opposition("-"), None);
    }

    #[test]
    fn test_player_and_team() {
        assert_eq!(
            player_and_team("V Kohli (IND)"),
            Some(("V Kohli".to_string(), Some("India".to_string())))
        );
        assert_eq!(
            player_and_team("JH Kallis (ICC/SA)"),
            Some(("JH Kallis".to_string(), Some("South Africa".to_string())))
        );
        assert_eq!(player_and_team("Unknown"), Some(("Unknown".to_string(), None)));
    }

    #[test]
    fn test_score() {
        assert_eq!(
            score("345/6d"),
            Some(Score { runs: 345, wickets: 6, declared: true })
        );
        assert_eq!(
            score("109"),
            Some(Score { runs: 109, wickets: 10, declared: false })
        );
        assert_eq!(
            score("0/0"),
            Some(Score { runs: 0, wickets: 0, declared: false })
        );
        assert_eq!(score("DNB"), None);
        assert_eq!(score("abc"), None);
    }

    #[test]
    fn test_runs() {
        assert_eq!(runs("123*"), Some((123, true)));
        assert_eq!(runs("0"), Some((0, false)));
        assert_eq!(runs("absent"), None);
    }

    #[test]
    fn test_overs() {
        let five_two = overs("5.2").unwrap();
        assert!((five_two - (5.0 + 2.0 / 6.0)).abs() < 1e-9);
        assert_eq!(overs("20"), Some(20.0));
        assert_eq!(overs("5.7"), None);
        assert_eq!(overs("-"), None);
    }

    #[test]
    fn test_date() {
        let expected = NaiveDate::from_ymd_opt(2022, 8, 13);
        assert_eq!(date("13 Aug 2022"), expected);
        assert_eq!(date("2022-08-13"), expected);
        assert_eq!(date("Aug 2022"), None);
    }

    #[test]
    fn test_numerics() {
        assert_eq!(int("-88"), Some(-88));
        assert_eq!(uint("-88"), None);
        assert_eq!(float("3.27"), Some(3.27));
        assert_eq!(innings("2"), Some(2));
        assert_eq!(innings("5"), None);
    }
}
