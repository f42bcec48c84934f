use super::atom::Atom;
use super::chain::{Chain, ChainType};
use super::entity::{EntityInfo, EntityType};
use super::group::{Group, ResidueNumber};
use super::header::DbRef;
use super::structure::Structure;
use nalgebra::Point3;

/// A chain of `groups` single-atom groups with consecutive serials.
///
/// Polymeric chains hold ALA residues numbered from 1, non-polymeric chains hold
/// HEM groups numbered from 500.
pub fn chain_with_atoms(
    asym_id: &str,
    auth_id: &str,
    chain_type: ChainType,
    first_serial: usize,
    groups: usize,
) -> Chain {
    let mut chain = Chain::new(asym_id, auth_id, chain_type);
    let (name, atom_name, element, first_number) = match chain_type {
        ChainType::Polymer => ("ALA", "CA", "C", 1),
        ChainType::NonPolymer => ("HEM", "FE", "FE", 500),
    };
    for i in 0..groups {
        let mut group = Group::new(name, ResidueNumber::from(first_number + i as i32));
        group.add_atom(Atom::new(
            first_serial + i,
            atom_name,
            element,
            Point3::new(i as f64 * 3.8, 1.5, -2.25),
        ));
        chain.add_group(group).unwrap();
    }
    chain
}

/// Entry 1ABC: polymer chain asym A / auth A (serials 1-3, residues 1-3) and a
/// HEM ligand chain asym B / auth A (serial 4, residue 500).
pub fn two_chain_structure() -> Structure {
    let mut structure = Structure::new();
    structure.set_pdb_code("1ABC");
    structure.set_entity_infos(vec![
        EntityInfo::new(1, EntityType::Polymer).with_description("ALANINE PEPTIDE"),
        EntityInfo::new(2, EntityType::NonPolymer).with_description("HEME"),
    ]);
    structure
        .add_model(vec![
            chain_with_atoms("A", "A", ChainType::Polymer, 1, 3).with_entity(1),
            chain_with_atoms("B", "A", ChainType::NonPolymer, 4, 1).with_entity(2),
        ])
        .unwrap();
    structure
}

/// A UniProt cross-reference for residues 1-3 of auth chain A in entry 1ABC.
pub fn dbref(accession: &str, db_id_code: &str) -> DbRef {
    DbRef {
        id_code: "1ABC".into(),
        chain_auth_id: "A".into(),
        seq_begin: ResidueNumber::from(1),
        seq_end: ResidueNumber::from(3),
        database: "UNP".into(),
        db_accession: accession.into(),
        db_id_code: db_id_code.into(),
        db_seq_begin: ResidueNumber::from(2),
        db_seq_end: ResidueNumber::from(4),
    }
}
