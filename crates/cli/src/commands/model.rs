//! Model inspection command

use anyhow::Result;
use risk_lib::ModelStore;

use crate::output::{print_info, OutputFormat};

/// Show the loaded artifact's contract: version, checksum, encoding mode,
/// vocabulary, and probability capability
pub fn run(store: &ModelStore, format: OutputFormat) -> Result<()> {
    let info = store.info();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        OutputFormat::Text => {
            print_info(&format!("Model version:  {}", info.version));
            print_info(&format!("Checksum:       {}", info.checksum));
            print_info(&format!("Size:           {} bytes", info.size_bytes));
            print_info(&format!("Input mode:     {:?}", info.input_mode));
            print_info(&format!(
                "Crops:          {} (reference: {})",
                info.crop_vocabulary.join(", "),
                store.reference_crop()
            ));
            print_info(&format!(
                "Probability:    {}",
                if info.supports_probability {
                    "supported"
                } else {
                    "class label only"
                }
            ));
        }
    }

    Ok(())
}
