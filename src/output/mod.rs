pub mod formatter;

pub use formatter::{
    format_model_catalogue, format_priority, format_results_table, format_tsv, should_use_colors,
    truncate_name,
};
