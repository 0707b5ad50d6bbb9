use crate::error::LoadError;
use crate::surface::TableRow;
use crate::users::UserRecord;

pub const LOADING_MESSAGE: &str = "Chargement…";
pub const EMPTY_MESSAGE: &str = "Aucun utilisateur trouvé.";
pub const TIMEOUT_MESSAGE: &str = "Temps de connexion dépassé.";
pub const NETWORK_ERROR_MESSAGE: &str =
    "Impossible de charger les utilisateurs. Vérifiez votre connexion.";

/// Number of columns in the people table.
pub const COLUMN_COUNT: usize = 3;

/// What the table body currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing loaded yet.
    #[default]
    Idle,
    /// Request in flight.
    Loading,
    Loaded(Vec<UserRecord>),
    /// The endpoint answered with no records.
    Empty,
    HttpError(u16),
    Timeout,
    /// Transport failure or malformed payload, with the diagnostic message.
    NetworkError(String),
}

impl LoadState {
    /// The user-facing message for non-data states.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Idle | Self::Loaded(_) => None,
            Self::Loading => Some(LOADING_MESSAGE.to_owned()),
            Self::Empty => Some(EMPTY_MESSAGE.to_owned()),
            Self::HttpError(status) => {
                Some(format!("Erreur lors de la récupération : HTTP {status}"))
            }
            Self::Timeout => Some(TIMEOUT_MESSAGE.to_owned()),
            Self::NetworkError(_) => Some(NETWORK_ERROR_MESSAGE.to_owned()),
        }
    }

    /// Rows to render in the table body.
    pub fn rows(&self) -> Vec<TableRow> {
        match self {
            Self::Idle => Vec::new(),
            Self::Loaded(records) => records.iter().map(TableRow::from_record).collect(),
            other => other
                .message()
                .map(|message| vec![TableRow::message(&message, COLUMN_COUNT)])
                .unwrap_or_default(),
        }
    }

    /// The loaded records, only for [`LoadState::Loaded`].
    pub fn records(&self) -> Option<&[UserRecord]> {
        match self {
            Self::Loaded(records) => Some(records),
            _ => None,
        }
    }

}

impl From<LoadError> for LoadState {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::Timeout => Self::Timeout,
            LoadError::Status(status) => Self::HttpError(status),
            LoadError::Network(message) | LoadError::Malformed(message) => {
                Self::NetworkError(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(LoadState::Idle.message(), None);
        assert_eq!(LoadState::Loading.message().as_deref(), Some("Chargement…"));
        assert_eq!(
            LoadState::Empty.message().as_deref(),
            Some("Aucun utilisateur trouvé.")
        );
        assert_eq!(
            LoadState::HttpError(500).message().as_deref(),
            Some("Erreur lors de la récupération : HTTP 500")
        );
        assert_eq!(
            LoadState::Timeout.message().as_deref(),
            Some("Temps de connexion dépassé.")
        );
        assert_eq!(
            LoadState::NetworkError("dns".to_owned()).message().as_deref(),
            Some("Impossible de charger les utilisateurs. Vérifiez votre connexion.")
        );
    }

    #[test]
    fn test_message_states_render_one_spanning_row() {
        let rows = LoadState::HttpError(404).rows();
        assert_eq!(rows.len(), 1);
        let cells = rows[0].cells();
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].colspan(), COLUMN_COUNT);
        assert_eq!(
            cells[0].markup().as_str(),
            "Erreur lors de la récupération : HTTP 404"
        );
    }

    #[test]
    fn test_loaded_rows_follow_records() {
        let state = LoadState::Loaded(vec![
            UserRecord::new("A&B", "ab", "a@b.com"),
            UserRecord::new("C", "c", "c@d.com"),
        ]);
        let rows = state.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].cells()[0].markup().as_str(), "A&amp;B");
        assert_eq!(rows[1].cells()[2].markup().as_str(), "c@d.com");
        assert_eq!(state.records().map(<[UserRecord]>::len), Some(2));
    }

    #[test]
    fn test_idle_renders_nothing() {
        assert!(LoadState::Idle.rows().is_empty());
        assert_eq!(LoadState::Idle.message(), None);
    }

    #[test]
    fn test_from_load_error() {
        assert_eq!(LoadState::from(LoadError::Timeout), LoadState::Timeout);
        assert_eq!(LoadState::from(LoadError::Status(503)), LoadState::HttpError(503));
        assert_eq!(
            LoadState::from(LoadError::Malformed("eof".to_owned())),
            LoadState::NetworkError("eof".to_owned())
        );
    }
}
