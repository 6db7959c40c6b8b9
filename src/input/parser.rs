use crate::error::ParseError;
use crate::types::{Family, Household, Person};
use anyhow::{Context, Result};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Parser for the line-oriented family description format.
///
/// The grammar, one person per line:
///
/// ```text
/// Name (attr, key=value, ...)        a parent of the current block
/// <TAB>Name (attr, key=value, ...)   a child of the current block
/// # comment                          ignored
///                                    blank line: closes the current block
/// ```
///
/// Consecutive non-blank lines form a household: unindented lines are its
/// parents (one or two), tab-indented lines are children of all of them.
/// Recognized value attributes: `id`, `surname`, `birthday`, `deathday`,
/// `notes`. Recognized bare attributes: `M`, `F`, `unique`.
///
/// A person reappearing with the same identifier merges into the existing
/// record, which is what lets marriages join separate lineages.
#[derive(Debug)]
pub struct FamilyParser {
    id_chars: Regex,
    unique_seen: HashMap<String, usize>,
}

impl FamilyParser {
    pub fn new() -> Self {
        Self {
            id_chars: Regex::new("[^0-9A-Za-z]").expect("valid regex"),
            unique_seen: HashMap::new(),
        }
    }

    /// Read and parse a family description file.
    pub fn parse_file<P: AsRef<Path>>(&mut self, path: P) -> Result<Family> {
        let path = path.as_ref();
        debug!("reading family description from {:?}", path);
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read family description from {:?}", path))?;
        let family = self.parse(&content)?;
        info!(
            "parsed {} persons in {} households from {:?}",
            family.len(),
            family.households().len(),
            path
        );
        Ok(family)
    }

    /// Parse a complete family description in a single forward pass.
    ///
    /// The current lineage context is the in-progress household carried
    /// through the loop; blank lines and end-of-input close it.
    pub fn parse(&mut self, text: &str) -> Result<Family, ParseError> {
        let mut family = Family::default();
        let mut block = Household::default();

        for (index, raw) in text.lines().enumerate() {
            let line_number = index + 1;
            let line = raw.trim_end();

            if line.is_empty() {
                Self::close_block(&mut family, &mut block);
                continue;
            }
            if line.starts_with('#') {
                continue;
            }

            if let Some(child) = line.strip_prefix('\t') {
                if block.parents.is_empty() {
                    return Err(ParseError::ChildWithoutParents { line: line_number });
                }
                let id = self.intern_person(&mut family, child, line_number)?;
                block.children.push(id);
            } else {
                if block.parents.len() == 2 {
                    return Err(ParseError::TooManyParents {
                        line: line_number,
                        count: block.parents.len() + 1,
                    });
                }
                let id = self.intern_person(&mut family, line, line_number)?;
                block.parents.push(id);
            }
        }
        Self::close_block(&mut family, &mut block);

        debug!(
            "parse complete: {} persons, {} households",
            family.len(),
            family.households().len()
        );
        Ok(family)
    }

    fn close_block(family: &mut Family, block: &mut Household) {
        if !block.is_empty() {
            family.add_household(std::mem::take(block));
        }
    }

    /// Parse one person description and add or merge it into the family.
    /// Returns the id under which the person is stored.
    fn intern_person(
        &mut self,
        family: &mut Family,
        description: &str,
        line: usize,
    ) -> Result<String, ParseError> {
        let description = description.trim();

        let (name_part, attr_part) = match description.find('(') {
            Some(open) => {
                let rest = &description[open + 1..];
                let close = rest
                    .rfind(')')
                    .ok_or(ParseError::UnterminatedAttributes { line })?;
                (&description[..open], Some(&rest[..close]))
            }
            None => (description, None),
        };

        let name = name_part.trim();
        if name.is_empty() {
            return Err(ParseError::MissingName { line });
        }

        let mut attributes = BTreeMap::new();
        let mut flags = BTreeSet::new();
        if let Some(list) = attr_part {
            for item in list.split(',') {
                let item = item.trim();
                if item.is_empty() {
                    continue;
                }
                match item.split_once('=') {
                    Some((key, value)) => {
                        attributes.insert(key.trim().to_string(), value.trim().to_string());
                    }
                    None => {
                        flags.insert(item.to_string());
                    }
                }
            }
        }

        let id = match attributes.get("id") {
            Some(explicit) => explicit.clone(),
            None => {
                let base = self.id_chars.replace_all(name, "").into_owned();
                if flags.contains("unique") {
                    // Deterministic stand-in for the usual random suffix:
                    // every mention of a `unique` person gets a fresh id.
                    let count = self.unique_seen.entry(base.clone()).or_insert(0);
                    *count += 1;
                    format!("{}{}", base, count)
                } else {
                    base
                }
            }
        };

        Ok(family.add_person(Person {
            id,
            name: name.to_string(),
            attributes,
            flags,
        }))
    }
}

impl Default for FamilyParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(text: &str) -> Family {
        FamilyParser::new().parse(text).unwrap()
    }

    #[test]
    fn test_parent_and_indented_child() {
        let family = parse("Louis XIV (M)\n\tLouis, Grand Dauphin (M)\n");

        assert_eq!(family.len(), 2);
        let rels: Vec<_> = family.relationships().collect();
        assert_eq!(rels, vec![("LouisXIV", "LouisGrandDauphin")]);
    }

    #[test]
    fn test_two_parent_block_yields_two_edges_into_one_child() {
        let family = parse("Louis XIV (M)\nMarie-Thérèse (F)\n\tLouis, Grand Dauphin\n");

        assert_eq!(family.len(), 3);
        let rels: Vec<_> = family.relationships().collect();
        assert_eq!(
            rels,
            vec![
                ("LouisXIV", "LouisGrandDauphin"),
                ("MarieThrse", "LouisGrandDauphin"),
            ]
        );
    }

    #[test]
    fn test_repeated_person_is_merged_not_duplicated() {
        let family = parse(
            "Louis XIV (M)\n\tLouis, Grand Dauphin\n\n\
             Louis, Grand Dauphin (birthday=1661)\n\tPetit Louis\n",
        );

        assert_eq!(family.len(), 3);
        let dauphin = family.person("LouisGrandDauphin").unwrap();
        assert_eq!(dauphin.attributes["birthday"], "1661");
        assert_eq!(family.households().len(), 2);
    }

    #[test]
    fn test_blank_lines_and_comments_are_ignored() {
        let family = parse("# the Sun King\n\nLouis XIV\n# his heir\n\tLouis, Grand Dauphin\n\n\n");

        assert_eq!(family.len(), 2);
        assert_eq!(family.households().len(), 1);
    }

    #[test]
    fn test_explicit_id_attribute() {
        let family = parse("Louis XIV (id=sunking)\n");
        assert_eq!(family.person("sunking").unwrap().name, "Louis XIV");
    }

    #[test]
    fn test_attribute_parsing() {
        let family = parse("Louis XIV (M, surname=le Grand, birthday=1638, deathday=1715)\n");

        let louis = family.person("LouisXIV").unwrap();
        assert!(louis.is_male());
        assert_eq!(louis.attributes["surname"], "le Grand");
        assert_eq!(louis.attributes["birthday"], "1638");
        assert_eq!(louis.attributes["deathday"], "1715");
    }

    #[test]
    fn test_unique_flag_never_merges() {
        let family = parse("Unknown (unique)\n\nUnknown (unique)\n");

        assert_eq!(family.len(), 2);
        assert!(family.person("Unknown1").is_some());
        assert!(family.person("Unknown2").is_some());
    }

    #[test]
    fn test_child_before_parent_fails_with_line_number() {
        let err = FamilyParser::new()
            .parse("# header\n\tOrphan Child\n")
            .unwrap_err();
        assert_eq!(err, ParseError::ChildWithoutParents { line: 2 });
    }

    #[test]
    fn test_unterminated_attribute_list_fails_with_line_number() {
        let err = FamilyParser::new()
            .parse("Louis XIV\n\tPhilippe (M, birthday=1640\n")
            .unwrap_err();
        assert_eq!(err, ParseError::UnterminatedAttributes { line: 2 });
    }

    #[test]
    fn test_missing_name_fails_with_line_number() {
        let err = FamilyParser::new().parse("(M, birthday=1638)\n").unwrap_err();
        assert_eq!(err, ParseError::MissingName { line: 1 });
    }

    #[test]
    fn test_three_parents_in_a_block_fails() {
        let err = FamilyParser::new().parse("A\nB\nC\n\tKid\n").unwrap_err();
        assert_eq!(err, ParseError::TooManyParents { line: 3, count: 3 });
    }

    #[test]
    fn test_parsing_is_deterministic() {
        let text = "Louis XIV (M)\nMarie-Thérèse (F)\n\tLouis, Grand Dauphin\n";
        let first = FamilyParser::new().parse(text).unwrap();
        let second = FamilyParser::new().parse(text).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parse_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "Louis XIV\n\tLouis, Grand Dauphin\n").unwrap();

        let family = FamilyParser::new().parse_file(file.path()).unwrap();
        assert_eq!(family.len(), 2);
    }

    #[test]
    fn test_parse_file_missing_path_is_an_error() {
        let result = FamilyParser::new().parse_file("/nonexistent/family.txt");
        assert!(result.is_err());
    }
}
