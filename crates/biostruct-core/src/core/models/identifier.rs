//! Textual identifiers describing which part of a source entry a structure holds.
//!
//! The canonical form is `PDBID[.RANGE[,RANGE...]]`, where each range is either a
//! bare chain id (`A`, the whole chain) or `CHAIN_START-END` with author residue
//! numbers that may be negative or carry insertion codes (`B_-5-100A`).

use super::group::ResidueNumber;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid structure identifier '{0}'")]
pub struct ParseIdentifierError(pub String);

/// A chain, or a residue interval of a chain, addressed by author ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResidueRange {
    pub chain_id: String,
    pub start: Option<ResidueNumber>,
    pub end: Option<ResidueNumber>,
}

impl ResidueRange {
    pub fn new(chain_id: &str, start: ResidueNumber, end: ResidueNumber) -> Self {
        Self {
            chain_id: chain_id.to_string(),
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn whole_chain(chain_id: &str) -> Self {
        Self {
            chain_id: chain_id.to_string(),
            start: None,
            end: None,
        }
    }

    /// Whether `residue_number` of chain `chain_id` falls inside this range.
    pub fn contains(&self, chain_id: &str, residue_number: &ResidueNumber) -> bool {
        if self.chain_id != chain_id {
            return false;
        }
        let after_start = self.start.is_none_or(|start| *residue_number >= start);
        let before_end = self.end.is_none_or(|end| *residue_number <= end);
        after_start && before_end
    }
}

impl fmt::Display for ResidueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.start, &self.end) {
            (Some(start), Some(end)) => write!(f, "{}_{}-{}", self.chain_id, start, end),
            _ => write!(f, "{}", self.chain_id),
        }
    }
}

impl FromStr for ResidueRange {
    type Err = ParseIdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseIdentifierError(s.to_string());
        let s = s.trim();
        let Some((chain_id, interval)) = s.split_once('_') else {
            if s.is_empty() {
                return Err(invalid());
            }
            return Ok(Self::whole_chain(s));
        };
        if chain_id.is_empty() {
            return Err(invalid());
        }

        // The separating '-' is the first one after a possible leading minus sign.
        let split = interval
            .char_indices()
            .skip(1)
            .find(|&(_, c)| c == '-')
            .map(|(i, _)| i);
        let (start, end) = match split {
            Some(i) => (&interval[..i], &interval[i + 1..]),
            None => (interval, interval),
        };
        let start = start.parse().map_err(|_| invalid())?;
        let end = end.parse().map_err(|_| invalid())?;
        Ok(Self::new(chain_id, start, end))
    }
}

/// An accession plus an optional list of residue ranges.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubstructureIdentifier {
    pub pdb_id: String,
    pub ranges: Vec<ResidueRange>,
}

impl SubstructureIdentifier {
    pub fn new(pdb_id: &str, ranges: Vec<ResidueRange>) -> Self {
        Self {
            pdb_id: pdb_id.to_string(),
            ranges,
        }
    }

    /// Whether the residue is part of the described subset. An identifier
    /// without ranges describes the full entry.
    pub fn covers(&self, chain_id: &str, residue_number: &ResidueNumber) -> bool {
        self.ranges.is_empty()
            || self
                .ranges
                .iter()
                .any(|range| range.contains(chain_id, residue_number))
    }
}

impl fmt::Display for SubstructureIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pdb_id)?;
        for (i, range) in self.ranges.iter().enumerate() {
            let separator = if i == 0 { '.' } else { ',' };
            write!(f, "{}{}", separator, range)?;
        }
        Ok(())
    }
}

impl FromStr for SubstructureIdentifier {
    type Err = ParseIdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (pdb_id, ranges) = match s.split_once('.') {
            Some((pdb_id, ranges)) => (pdb_id, Some(ranges)),
            None => (s, None),
        };
        if pdb_id.is_empty() {
            return Err(ParseIdentifierError(s.to_string()));
        }
        let ranges = match ranges {
            Some(ranges) => ranges
                .split(',')
                .map(str::parse)
                .collect::<Result<Vec<ResidueRange>, _>>()?,
            None => Vec::new(),
        };
        Ok(Self::new(pdb_id, ranges))
    }
}

/// Provenance of an in-memory structure: the string it was requested with and
/// the subset of the source entry that string resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructureIdentifier {
    identifier: String,
    substructure: SubstructureIdentifier,
}

impl StructureIdentifier {
    /// The identifier exactly as originally given.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn to_canonical(&self) -> &SubstructureIdentifier {
        &self.substructure
    }

    pub fn pdb_id(&self) -> &str {
        &self.substructure.pdb_id
    }

    pub fn residue_ranges(&self) -> &[ResidueRange] {
        &self.substructure.ranges
    }

    pub fn ranges(&self) -> Vec<String> {
        self.substructure
            .ranges
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}

impl FromStr for StructureIdentifier {
    type Err = ParseIdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            identifier: s.to_string(),
            substructure: s.parse()?,
        })
    }
}

impl From<SubstructureIdentifier> for StructureIdentifier {
    fn from(substructure: SubstructureIdentifier) -> Self {
        Self {
            identifier: substructure.to_string(),
            substructure,
        }
    }
}

impl fmt::Display for StructureIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn residue_range_parses_whole_chain_and_intervals() {
        assert_eq!("A".parse(), Ok(ResidueRange::whole_chain("A")));
        assert_eq!(
            "B_5-100".parse(),
            Ok(ResidueRange::new("B", 5.into(), 100.into()))
        );
        assert_eq!(
            "A_-5-10".parse(),
            Ok(ResidueRange::new("A", (-5).into(), 10.into()))
        );
        assert_eq!(
            "A_-10--5".parse(),
            Ok(ResidueRange::new("A", (-10).into(), (-5).into()))
        );
        assert_eq!(
            "C_1A-7B".parse(),
            Ok(ResidueRange::new(
                "C",
                ResidueNumber::new(1, Some('A')),
                ResidueNumber::new(7, Some('B'))
            ))
        );
        assert_eq!(
            "D_42".parse(),
            Ok(ResidueRange::new("D", 42.into(), 42.into()))
        );
    }

    #[test]
    fn residue_range_rejects_malformed_input() {
        assert!("".parse::<ResidueRange>().is_err());
        assert!("_1-5".parse::<ResidueRange>().is_err());
        assert!("A_x-5".parse::<ResidueRange>().is_err());
    }

    #[test]
    fn residue_range_display_round_trips() {
        for text in ["A", "B_5-100", "A_-5-10", "C_1A-7B"] {
            let range: ResidueRange = text.parse().unwrap();
            assert_eq!(range.to_string(), text);
        }
    }

    #[test]
    fn residue_range_contains_checks_chain_and_bounds() {
        let range = ResidueRange::new("A", 10.into(), 20.into());
        assert!(range.contains("A", &10.into()));
        assert!(range.contains("A", &ResidueNumber::new(15, Some('A'))));
        assert!(!range.contains("A", &21.into()));
        assert!(!range.contains("B", &15.into()));
        assert!(ResidueRange::whole_chain("B").contains("B", &(-99).into()));
    }

    #[test]
    fn substructure_identifier_parses_and_prints() {
        let id: SubstructureIdentifier = "4HHB.A,B_5-100".parse().unwrap();
        assert_eq!(id.pdb_id, "4HHB");
        assert_eq!(id.ranges.len(), 2);
        assert_eq!(id.to_string(), "4HHB.A,B_5-100");

        let full: SubstructureIdentifier = "1abc".parse().unwrap();
        assert!(full.ranges.is_empty());
        assert_eq!(full.to_string(), "1abc");
        assert!(full.covers("Z", &1.into()));

        assert!(".A".parse::<SubstructureIdentifier>().is_err());
        assert!("1ABC.A,".parse::<SubstructureIdentifier>().is_err());
    }

    #[test]
    fn structure_identifier_keeps_original_text() {
        let id: StructureIdentifier = " 4hhb.A ".parse().unwrap();
        assert_eq!(id.identifier(), " 4hhb.A ");
        assert_eq!(id.pdb_id(), "4hhb");
        assert_eq!(id.ranges(), vec!["A".to_string()]);
        assert!(id.to_canonical().covers("A", &7.into()));
        assert!(!id.to_canonical().covers("B", &7.into()));
    }

    #[test]
    fn structure_identifier_from_substructure_uses_canonical_text() {
        let sub = SubstructureIdentifier::new("2XYZ", vec![ResidueRange::whole_chain("C")]);
        let id = StructureIdentifier::from(sub);
        assert_eq!(id.identifier(), "2XYZ.C");
        assert_eq!(id.residue_ranges().len(), 1);
    }
}
