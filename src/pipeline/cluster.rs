use std::path::Path;

use anyhow::Result;

use crate::pipeline::GAP_THRESHOLD;
use crate::proc::ProcessSpec;

/// Build the clusterer invocation.
///
/// The tool decides how many `{prefix}_cluster_{n}.afa` files it writes
/// into the output directory; enumerating them is left to the HMM
/// generator's discovery pass.
pub fn cluster_spec(input: &Path, out_dir: &Path, prefix: &str) -> ProcessSpec {
    ProcessSpec::new("cluster_msa")
        .arg(input)
        .arg(out_dir)
        .args(["--prefix", prefix])
        .args(["--gap-threshold", &GAP_THRESHOLD.to_string()])
}

/// Split an alignment into subalignments sharing a file-name prefix.
pub fn cluster(input: &Path, out_dir: &Path, prefix: &str) -> Result<()> {
    cluster_spec(input, out_dir, prefix).run()
}
