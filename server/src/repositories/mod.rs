//! Repositories module - Coordinatore per tutti i repository del progetto
//!
//! Ogni repository gestisce le operazioni di database per una specifica entità.

// ************************* NOTA SU SQLX ************************* //

/*
   Le query sono scritte con sqlx::query / sqlx::query_as::<_, T> (controllo a run-time)
   e le entity derivano sqlx::FromRow: così la build non ha bisogno di un database acceso.
   Il controllo dello schema lo fanno i test di integrazione (#[sqlx::test]) che applicano
   le migration in server/migrations.

   Promemoria sui metodi:
   .execute        -> INSERT/UPDATE/DELETE, usare rows_affected() per sapere se c'era la riga
   .fetch_optional -> zero o una riga
   .fetch_one      -> esattamente una (COUNT(*) e aggregati)
   .fetch_all      -> Vec con tutte le righe

   Gli errori sqlx vengono classificati in StoreError (vincoli unique / foreign key,
   riga mancante) così l'engine può decidere il codice di risposta.
*/

// ************************* MODULI REPOSITORY ************************* //

pub mod error;
pub mod friendship;
pub mod group;
pub mod message;
pub mod notification;
pub mod traits;
pub mod user;

pub use error::StoreError;
pub use traits::{GroupStore, NotificationStore, RelationshipStore};

// Re-esportazione delle struct dei repository per facilitare l'import
pub use friendship::FriendshipRepository;
pub use group::GroupRepository;
pub use message::MessageRepository;
pub use notification::NotificationRepository;
pub use user::UserRepository;
