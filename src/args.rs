use clap::Parser;

/// This is a merit list generator for admission counselling rounds.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON file describing the candidate files, the seat matrix and the
    /// call multiplier. See the manual of merit_engine for the format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference file containing the expected summary of the run in JSON format. If provided,
    /// meritlist will check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (directory path) If specified, the merit lists will be written as CSV files in this directory.
    /// Setting this option overrides the directory that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the run will be written in JSON format
    /// to the given location.
    #[clap(short, long, value_parser)]
    pub summary: Option<String>,

    /// (file path or empty) The Excel or CSV file with the candidates. Setting this option overrides the
    /// candidate files that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (csv or xlsx, default from the file extension) The type of the input.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use (default: the first one).
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// The row of the seat matrix to use, written as 'Program (Campus)'.
    #[clap(long, value_parser)]
    pub program: Option<String>,

    /// (CATEGORY=N, repeated) Seat counts overriding the seat matrix of the configuration.
    #[clap(long, value_parser)]
    pub seats: Vec<String>,

    /// The number of candidates called for counselling per available seat.
    #[clap(long, value_parser)]
    pub call_multiplier: Option<u32>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
