use std::collections::HashSet;

use crate::models::CandidateId;
use crate::services::{CandidateRepository, StoreError};

/// Normalize a skill name to the stored convention: first character in
/// title case, the rest lower case ("pYTHON" -> "Python").
pub fn normalize_skill_name(name: &str) -> String {
    let mut chars = name.chars();

    match chars.next() {
        Some(first) => {
            let mut normalized = titlecase(first);
            normalized.extend(chars.flat_map(char::to_lowercase));
            normalized
        }
        None => String::new(),
    }
}

/// Title case of a single character.
///
/// Differs from upper case for the Latin digraphs, `ß` and the `ﬀ`-style
/// ligatures; everything else maps through `char::to_uppercase`.
fn titlecase(c: char) -> String {
    let mapped = match c {
        'Ǆ' | 'ǅ' | 'ǆ' => "ǅ",
        'Ǉ' | 'ǈ' | 'ǉ' => "ǈ",
        'Ǌ' | 'ǋ' | 'ǌ' => "ǋ",
        'Ǳ' | 'ǲ' | 'ǳ' => "ǲ",
        'ß' => "Ss",
        'ﬀ' => "Ff",
        'ﬁ' => "Fi",
        'ﬂ' => "Fl",
        'ﬃ' => "Ffi",
        'ﬄ' => "Ffl",
        'ﬅ' | 'ﬆ' => "St",
        _ => return c.to_uppercase().collect(),
    };

    mapped.to_string()
}

/// Candidates holding the job's required skill.
///
/// Fails with `StoreError::NotFound` when no skill has the normalized name.
pub async fn match_by_skill<R>(repo: &R, skill: &str) -> Result<HashSet<CandidateId>, StoreError>
where
    R: CandidateRepository,
{
    let skill = repo.get_skill_by_name(&normalize_skill_name(skill)).await?;
    let matches = repo.find_candidates_by_skill(skill.id).await?;

    tracing::debug!("Skill '{}' held by {} candidates", skill.skill_name, matches.len());

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_skill_name() {
        assert_eq!(normalize_skill_name("python"), "Python");
        assert_eq!(normalize_skill_name("pYTHON"), "Python");
        assert_eq!(normalize_skill_name("Python"), "Python");
        assert_eq!(normalize_skill_name("c++"), "C++");
        assert_eq!(normalize_skill_name(""), "");
    }

    #[test]
    fn test_first_character_uses_title_case() {
        assert_eq!(normalize_skill_name("ßtyle"), "Sstyle");
        assert_eq!(normalize_skill_name("ǆango"), "ǅango");
        assert_eq!(normalize_skill_name("ǄANGO"), "ǅango");
        assert_eq!(normalize_skill_name("ﬁnance"), "Finance");
        assert_eq!(normalize_skill_name("élan"), "Élan");
    }

    #[test]
    fn test_normalize_lowercases_every_later_word() {
        assert_eq!(normalize_skill_name("machine Learning"), "Machine learning");
    }
}
