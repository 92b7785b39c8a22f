use thiserror::Error;

/// Scots error messages - gie the user a guid tellin' aff!
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SortitError {
    #[error("Memory's fair scunnered! Couldnae allocate an array o' {len} numbers")]
    AllocationFailed { len: usize },

    #[error("Yer length's aw wrang: '{input}' isnae a whole number o' elements")]
    InvalidLength { input: String },

    #[error("That range is mince! Nae numbers fit atween {low} an' {high}")]
    InvalidBound { low: i64, high: i64 },

    #[error("Ah dinnae ken a sort called '{name}'")]
    UnkentAlgorithm { name: String },

    #[error("'{value}' isnae a number ah can sort")]
    InvalidValue { value: String },

    #[error("Invalid log filter '{spec}'")]
    InvalidLogFilter { spec: String },

    #[error("Invalid log format '{format}'")]
    InvalidLogFormat { format: String },

    #[error("Dinnae be daft! Input/output went wrang: {0}")]
    Io(String),
}

impl From<std::io::Error> for SortitError {
    fn from(err: std::io::Error) -> Self {
        SortitError::Io(err.to_string())
    }
}

pub type SortitResult<T> = Result<T, SortitError>;

/// Scots phrases fer random error decoration
pub fn random_scots_exclamation() -> &'static str {
    let seed = chrono::Utc::now().timestamp_subsec_nanos() as usize;

    const PHRASES: &[&str] = &[
        "Och naw!",
        "Jings crivvens!",
        "Haud yer wheesht!",
        "Michty me!",
        "Hoots mon!",
        "Help ma boab!",
        "Crivvens!",
        "Whit a scunner!",
        "Aw naw!",
        "Dearie me!",
        "Whit a fankle!",
        "Sufferin' sporrans!",
        "Tatties an' neeps!",
        "Yer numbers are in a right guddle!",
    ];

    PHRASES[seed % PHRASES.len()]
}

/// Get a helpful suggestion fer common errors
pub fn get_error_suggestion(error: &SortitError) -> Option<&'static str> {
    match error {
        SortitError::InvalidLength { input } => {
            if input.trim().starts_with('-') {
                Some("💡 An array cannae hae a negative length! Try somethin' like 10.")
            } else if input.trim().is_empty() {
                Some("💡 Ye didnae type anything! Enter a length like 10, or pass --size.")
            } else {
                Some("💡 Enter a whole number, like 10 or 50.")
            }
        }
        SortitError::InvalidBound { .. } => {
            Some("💡 Make sure --low is nae bigger than --high.")
        }
        SortitError::UnkentAlgorithm { .. } => {
            Some("💡 Pick one o' 'bubble', 'merge' or 'quick'.")
        }
        SortitError::InvalidValue { .. } => {
            Some("💡 Pass values as a comma-separated list o' integers: --values 5,3,8,1")
        }
        SortitError::AllocationFailed { .. } => {
            Some("💡 Try a smaller --size - that array's too muckle fer this machine!")
        }
        SortitError::InvalidLogFilter { .. } => Some(
            "💡 SORTIT_LOG takes levels like 'mutter' or rules like 'sortit::sort=whisper'.",
        ),
        SortitError::InvalidLogFormat { .. } => {
            Some("💡 SORTIT_LOG_FORMAT takes 'text', 'compact' or 'json'.")
        }
        SortitError::Io(_) => None,
    }
}
