use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayerError {
    // Seul play_list accepte un index fourni par l'appelant
    #[error("Start index out of bound {index} >= {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

impl PlayerError {
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        PlayerError::IndexOutOfRange { index, len }
    }
}
