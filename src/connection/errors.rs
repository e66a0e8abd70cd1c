use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConnectionError {
    #[error("Cannot combine forward (first/after) and backward (last/before) pagination")]
    ConflictingPagination,

    #[error("Invalid order `{0}`: expected <field>_ASC or <field>_DESC")]
    InvalidOrder(String),

    #[error("Cannot order by `{0}`: not an indexed field")]
    UnknownOrderField(String),
}
