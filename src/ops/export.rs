use crate::db::Catalog;
use crate::io::{self, DataItem};
use crate::model::pose::{PoseProperties, PoseSet};
use crate::ops::assemble::{AssembleConfig, assemble, combine_molecules};
use crate::ops::error::Error;
use serde::Serialize;

/// SD text for a whole pose set plus the groups that could not be rebuilt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SdfExport {
    /// Concatenated SD records, one per conformer; empty when nothing was rebuilt.
    pub text: String,
    /// Input positions of the failed pose groups.
    pub failures: Vec<usize>,
}

#[derive(Debug, Default, Serialize)]
struct PoseAnnotation {
    #[serde(skip_serializing_if = "Option::is_none")]
    free_energy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    intermolecular_energy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    internal_energy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cluster_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cluster_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rank_in_cluster: Option<u32>,
}

impl PoseAnnotation {
    /// Scores of pose `pose` from every property list holding exactly `expected` values.
    fn collect(properties: &PoseProperties, pose: usize, expected: usize) -> Self {
        fn pick<T: Copy>(values: &[T], pose: usize, expected: usize) -> Option<T> {
            if values.len() == expected {
                values.get(pose).copied()
            } else {
                None
            }
        }

        Self {
            free_energy: pick(&properties.free_energies, pose, expected),
            intermolecular_energy: pick(&properties.intermolecular_energies, pose, expected),
            internal_energy: pick(&properties.internal_energies, pose, expected),
            cluster_size: pick(&properties.cluster_size, pose, expected),
            cluster_id: pick(&properties.cluster_id, pose, expected),
            rank_in_cluster: pick(&properties.rank_in_cluster, pose, expected),
        }
    }
}

/// Rebuilds every pose group, joins the results, and writes them as SD text.
///
/// Conformer `i` of the output is pose `pose_ids[i]` of the input. Each record carries a
/// JSON data item under `config.annotation_tag` with the scores of its pose; a score list
/// contributes only when its length equals the number of written conformers and that
/// number equals the number of retained poses.
///
/// # Errors
///
/// Returns [`Error::NoClusterLeads`] as [`assemble`] does, and
/// [`Error::ConformerCountMismatch`] when the rebuilt molecules cannot be joined.
/// Serialization failures are returned as [`ExportError::Io`].
pub fn export_sdf(
    catalog: &Catalog,
    poses: &PoseSet,
    config: &AssembleConfig,
) -> Result<SdfExport, ExportError> {
    let assembly = assemble(catalog, poses, config)?;
    let failures = assembly.failures;
    let pose_ids = assembly.pose_ids;

    let Some(combined) = combine_molecules(assembly.molecules)? else {
        return Ok(SdfExport {
            text: String::new(),
            failures,
        });
    };

    let n_conformers = combined.conformer_count();
    let expected = if n_conformers == pose_ids.len() {
        n_conformers
    } else {
        usize::MAX
    };

    let data = (0..n_conformers)
        .map(|i| {
            let annotation = match pose_ids.get(i) {
                Some(&pose) => PoseAnnotation::collect(&poses.properties, pose, expected),
                None => PoseAnnotation::default(),
            };
            let value = serde_json::to_string(&annotation).map_err(ExportError::Annotation)?;
            Ok(vec![DataItem::new(config.annotation_tag.as_str(), value)])
        })
        .collect::<Result<Vec<_>, ExportError>>()?;

    let mut buffer = Vec::new();
    io::write_sdf(&mut buffer, &combined, &data)?;
    let text = String::from_utf8(buffer).map_err(|e| {
        ExportError::Io(io::Error::inconsistent_data("SDF", e.to_string()))
    })?;

    Ok(SdfExport { text, failures })
}

/// Failures of [`export_sdf`], split by layer.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Assemble(#[from] Error),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("failed to encode pose annotation: {0}")]
    Annotation(#[source] serde_json::Error),
}
