use std::path::Path;

use log::info;

use super::{FeatureError, FeatureTable};
use crate::scan::FileIndex;

/// Concatenate per-run feature tables, prefixing `spec_group_id` and `scans`
/// with `F<index>:` where `index` is the file's position in `paths`.
///
/// `paths` must be in the same order as the MGF files given to
/// [`crate::mgf::merge_mgf`] for the merged scans to line up.
pub fn merge_features<P: AsRef<Path>>(paths: &[P]) -> Result<FeatureTable, FeatureError> {
    let mut merged = FeatureTable::new();
    for (index, path) in paths.iter().enumerate() {
        let path = path.as_ref();
        let table = FeatureTable::read_csv(path)?;
        info!(
            "Merging {} rows from {} as {}",
            table.len(),
            path.display(),
            FileIndex(index)
        );
        merge_features_into(FileIndex(index), table, &mut merged);
    }
    info!(
        "Merged {} feature files into {} rows",
        paths.len(),
        merged.len()
    );
    Ok(merged)
}

/// Prefix one run's table and append it to `merged`
pub fn merge_features_into(index: FileIndex, mut table: FeatureTable, merged: &mut FeatureTable) {
    table.prefix_scans(index);
    merged.append(table);
}
