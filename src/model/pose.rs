//! Docking pose records as handed over by the pose-file reader.
//!
//! A [`PoseSet`] is the in-memory form of one docking result: a flat atom table shared by
//! every pose, the coordinates of that table for each pose, the per-entity bookkeeping
//! (structure descriptor and index correspondences), and per-pose scores. Index
//! correspondences are persisted 1-based as flat integer lists and converted to 0-based
//! [`IndexPair`]s on load.

use super::types::Point;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// One entry of an index correspondence, both sides 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexPair {
    /// Atom index in the graph generated from the structure descriptor.
    pub descriptor: usize,
    /// Index into the externally supplied per-atom array (coordinates or names).
    pub source: usize,
}

impl IndexPair {
    pub fn new(descriptor: usize, source: usize) -> Self {
        Self { descriptor, source }
    }
}

/// Problems found while reading a persisted index correspondence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CorrespondenceError {
    #[error("index correspondence must hold pairs, got {len} values")]
    OddLength { len: usize },

    #[error("index correspondence is 1-based, found 0 at position {position}")]
    ZeroIndex { position: usize },
}

/// Ordered list of [`IndexPair`]s.
///
/// Serialized as the flat 1-based list `[d1, s1, d2, s2, ...]` used by docking output
/// remarks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct IndexCorrespondence {
    pairs: Vec<IndexPair>,
}

impl IndexCorrespondence {
    pub fn new(pairs: Vec<IndexPair>) -> Self {
        Self { pairs }
    }

    /// Parses the persisted flat 1-based form.
    ///
    /// # Errors
    ///
    /// Returns [`CorrespondenceError::OddLength`] when the list cannot be split into
    /// pairs and [`CorrespondenceError::ZeroIndex`] for a zero entry.
    pub fn from_one_based(flat: &[usize]) -> Result<Self, CorrespondenceError> {
        if flat.len() % 2 != 0 {
            return Err(CorrespondenceError::OddLength { len: flat.len() });
        }
        if let Some(position) = flat.iter().position(|&i| i == 0) {
            return Err(CorrespondenceError::ZeroIndex { position });
        }
        let pairs = flat
            .chunks_exact(2)
            .map(|chunk| IndexPair::new(chunk[0] - 1, chunk[1] - 1))
            .collect();
        Ok(Self { pairs })
    }

    /// Renders the persisted flat 1-based form.
    pub fn to_one_based(&self) -> Vec<usize> {
        self.pairs
            .iter()
            .flat_map(|p| [p.descriptor + 1, p.source + 1])
            .collect()
    }

    pub fn pairs(&self) -> &[IndexPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexPair> {
        self.pairs.iter()
    }
}

impl TryFrom<Vec<usize>> for IndexCorrespondence {
    type Error = CorrespondenceError;

    fn try_from(flat: Vec<usize>) -> Result<Self, Self::Error> {
        Self::from_one_based(&flat)
    }
}

impl From<IndexCorrespondence> for Vec<usize> {
    fn from(map: IndexCorrespondence) -> Self {
        map.to_one_based()
    }
}

impl FromIterator<IndexPair> for IndexCorrespondence {
    fn from_iter<T: IntoIterator<Item = IndexPair>>(iter: T) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

/// Labels of one atom in the pose file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoseAtom {
    /// Atom name, e.g. `"CA"` or `"HZ1"`.
    pub name: SmolStr,
    /// Residue label the atom belongs to, e.g. `"LYS"` or `"UNL"`.
    pub res_name: SmolStr,
}

impl PoseAtom {
    pub fn new(name: &str, res_name: &str) -> Self {
        Self {
            name: SmolStr::new(name),
            res_name: SmolStr::new(res_name),
        }
    }
}

/// One docked entity (ligand or flexible side chain) across all poses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoseGroup {
    /// Structure descriptor recorded by the preparation step, absent for flexible
    /// side chains.
    #[serde(default)]
    pub smiles: Option<String>,
    /// Descriptor atom → position within `atom_indices`, for heavy atoms.
    #[serde(default)]
    pub index_map: IndexCorrespondence,
    /// Descriptor parent atom → position within `atom_indices`, for polar hydrogens.
    #[serde(default)]
    pub h_parent: IndexCorrespondence,
    /// Positions of this entity's atoms in the shared atom table.
    pub atom_indices: Vec<usize>,
}

/// Per-pose scalar annotations; any list may be empty when the docking engine did not
/// report it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseProperties {
    pub free_energies: Vec<f64>,
    pub intermolecular_energies: Vec<f64>,
    pub internal_energies: Vec<f64>,
    pub cluster_size: Vec<u32>,
    pub cluster_id: Vec<u32>,
    pub rank_in_cluster: Vec<u32>,
}

/// Complete docking result for one receptor/ligand run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseSet {
    /// Atom labels shared by every pose.
    pub atoms: Vec<PoseAtom>,
    /// Docked entities in file order.
    pub groups: Vec<PoseGroup>,
    /// Coordinates of the whole atom table, one entry per pose.
    pub poses: Vec<Vec<[f64; 3]>>,
    /// Pose indices of cluster representatives, best first.
    #[serde(default)]
    pub cluster_leads: Vec<usize>,
    #[serde(default)]
    pub properties: PoseProperties,
}

impl PoseSet {
    pub fn pose_count(&self) -> usize {
        self.poses.len()
    }

    /// Coordinates of the selected atoms in one pose, in the order of `atom_indices`.
    ///
    /// Returns `None` when the pose or any atom index is out of range.
    pub fn positions(&self, pose: usize, atom_indices: &[usize]) -> Option<Vec<Point>> {
        let table = self.poses.get(pose)?;
        atom_indices
            .iter()
            .map(|&idx| table.get(idx).map(|&xyz| Point::from(xyz)))
            .collect()
    }

    /// Labels of the selected atoms, in the order of `atom_indices`.
    pub fn atoms_of(&self, atom_indices: &[usize]) -> Option<Vec<&PoseAtom>> {
        atom_indices.iter().map(|&idx| self.atoms.get(idx)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_correspondence_converts_from_one_based_pairs() {
        let map = IndexCorrespondence::from_one_based(&[1, 3, 2, 1]).unwrap();

        assert_eq!(
            map.pairs(),
            &[IndexPair::new(0, 2), IndexPair::new(1, 0)]
        );
        assert_eq!(map.to_one_based(), vec![1, 3, 2, 1]);
    }

    #[test]
    fn index_correspondence_rejects_odd_length_and_zero() {
        assert_eq!(
            IndexCorrespondence::from_one_based(&[1, 2, 3]),
            Err(CorrespondenceError::OddLength { len: 3 })
        );
        assert_eq!(
            IndexCorrespondence::from_one_based(&[1, 2, 4, 0]),
            Err(CorrespondenceError::ZeroIndex { position: 3 })
        );
        assert!(IndexCorrespondence::from_one_based(&[]).unwrap().is_empty());
    }

    #[test]
    fn pose_set_deserializes_from_json() {
        let json = r#"{
            "atoms": [
                {"name": "C1", "res_name": "UNL"},
                {"name": "O1", "res_name": "UNL"}
            ],
            "groups": [
                {"smiles": "CO", "index_map": [1, 1, 2, 2], "h_parent": [], "atom_indices": [0, 1]}
            ],
            "poses": [
                [[0.0, 0.0, 0.0], [1.4, 0.0, 0.0]],
                [[0.0, 1.0, 0.0], [1.4, 1.0, 0.0]]
            ],
            "properties": {"free_energies": [-6.1, -5.2]}
        }"#;

        let poses: PoseSet = serde_json::from_str(json).unwrap();

        assert_eq!(poses.pose_count(), 2);
        assert_eq!(poses.groups[0].index_map.len(), 2);
        assert_eq!(poses.groups[0].index_map.pairs()[1], IndexPair::new(1, 1));
        assert!(poses.cluster_leads.is_empty());
        assert_eq!(poses.properties.free_energies, vec![-6.1, -5.2]);
        assert!(poses.properties.cluster_id.is_empty());
    }

    #[test]
    fn pose_set_rejects_malformed_index_map() {
        let json = r#"{"atoms": [], "groups": [{"index_map": [1], "atom_indices": []}], "poses": []}"#;

        let err = serde_json::from_str::<PoseSet>(json).unwrap_err();
        assert!(err.to_string().contains("must hold pairs, got 1 values"));
    }

    #[test]
    fn positions_selects_atoms_for_requested_pose() {
        let poses = PoseSet {
            atoms: vec![PoseAtom::new("A", "UNL"), PoseAtom::new("B", "UNL")],
            poses: vec![vec![[1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]],
            ..PoseSet::default()
        };

        assert_eq!(
            poses.positions(0, &[1, 0]),
            Some(vec![Point::new(2.0, 0.0, 0.0), Point::new(1.0, 0.0, 0.0)])
        );
        assert_eq!(poses.positions(1, &[0]), None);
        assert_eq!(poses.positions(0, &[2]), None);
        assert_eq!(poses.atoms_of(&[1]).map(|a| a[0].name.clone()), Some("B".into()));
    }
}
