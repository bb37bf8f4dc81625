/// Errors raised while combining bytecode units
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    #[error("LinkError: duplicate symbol '{symbol}' exported by '{first}' and '{second}'")]
    DuplicateSymbol {
        symbol: String,
        first: String,
        second: String,
    },
    #[error("LinkError: undefined symbol '{symbol}' imported by '{unit}'")]
    UndefinedSymbol { symbol: String, unit: String },
    #[error("LinkError: duplicate function '{name}'")]
    DuplicateFunction { name: String },
    #[error(
        "LinkError: '{function}' in '{unit}' loads constant {index}, which the unit's pool does not define"
    )]
    ConstantOutOfRange {
        unit: String,
        function: String,
        index: usize,
    },
    #[error("LinkError: jump target {target} in '{function}' of '{unit}' overflows when moved by {offset}")]
    JumpOutOfRange {
        unit: String,
        function: String,
        target: usize,
        offset: usize,
    },
}
