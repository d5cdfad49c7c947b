//! Application State - stato condiviso tra route e middleware
//!
//! Contiene i repository (Persistence Service), lo storage delle immagini
//! e il segreto usato per firmare i token.

use crate::media::MediaStore;
use crate::repositories::{
    FriendshipRepository, GroupRepository, MessageRepository, NotificationRepository,
    UserRepository,
};
use sqlx::MySqlPool;

pub struct AppState {
    /// Repository per la gestione degli utenti
    pub user: UserRepository,

    /// Repository per richieste di amicizia e amicizie
    pub friendship: FriendshipRepository,

    /// Repository per gruppi, membri e inviti
    pub group: GroupRepository,

    /// Repository per le notifiche (sola lettura)
    pub notification: NotificationRepository,

    /// Repository per i messaggi
    pub msg: MessageRepository,

    /// Storage locale delle immagini allegate ai messaggi
    pub media: MediaStore,

    /// Secret key per JWT token
    pub jwt_secret: String,
}

impl AppState {
    /// Crea una nuova istanza di AppState inizializzando tutti i repository
    /// con il pool di connessioni fornito e la JWT secret.
    pub fn new(pool: MySqlPool, jwt_secret: String) -> Self {
        Self {
            user: UserRepository::new(pool.clone()),
            friendship: FriendshipRepository::new(pool.clone()),
            group: GroupRepository::new(pool.clone()),
            notification: NotificationRepository::new(pool.clone()),
            msg: MessageRepository::new(pool),
            media: MediaStore::default(),
            jwt_secret,
        }
    }

    pub fn with_media(mut self, media: MediaStore) -> Self {
        self.media = media;
        self
    }
}
