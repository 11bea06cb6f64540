use std::path::Path;

use anyhow::Result;

use crate::args::FileFormat;
use crate::proc::ProcessSpec;

/// Build the conversion tool invocation.
///
/// `convert_msa` takes the input, the output, the two format tokens, and a
/// flag selecting removal of columns that contain lowercase (unaligned)
/// residues. The output format is always aligned fasta here: every later
/// stage reads the canonical working format.
pub fn convert_spec(
    input: &Path,
    input_format: FileFormat,
    output: &Path,
    remove_unaligned_columns: bool,
) -> ProcessSpec {
    let mut spec = ProcessSpec::new("convert_msa")
        .arg(input)
        .arg(output)
        .arg(input_format.as_convert_token())
        .arg(FileFormat::Fasta.as_convert_token());
    if remove_unaligned_columns {
        spec = spec.arg("--remove-lowercase-columns");
    }
    spec
}

/// Normalize an alignment into the canonical working format.
pub fn convert(
    input: &Path,
    input_format: FileFormat,
    output: &Path,
    remove_unaligned_columns: bool,
) -> Result<()> {
    convert_spec(input, input_format, output, remove_unaligned_columns).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_always_targets_fasta() {
        let spec = convert_spec(
            Path::new("PF00001_seed.sto"),
            FileFormat::Stockholm,
            Path::new("PF00001_seed.afa"),
            true,
        );
        assert_eq!(
            spec.render(),
            "convert_msa PF00001_seed.sto PF00001_seed.afa stockholm fasta --remove-lowercase-columns"
        );
    }

    #[test]
    fn column_removal_is_optional() {
        let spec = convert_spec(
            Path::new("in.afa"),
            FileFormat::Fasta,
            Path::new("out.afa"),
            false,
        );
        assert_eq!(spec.render(), "convert_msa in.afa out.afa fasta fasta");
    }
}
