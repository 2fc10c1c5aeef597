use clap::Parser;

/// This program turns tabular data into chart and table objects ready to be rendered.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The JSON file with the settings of the chart or of the table.
    /// For more information about the file format, read the manual of the chart_builder crate.
    #[clap(short, long, value_parser)]
    pub config: String,

    /// (file path) A reference file containing the expected object in JSON format. If provided,
    /// chartbuild will check that the built object matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the built object will be written in JSON
    /// format to the given location. It is printed on the standard output otherwise.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) The file with the data. Setting this option overrides the input
    /// that may be specified in the --config file.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default text) The type of the input: text, csv or xlsx.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use. The first
    /// worksheet is used otherwise.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
