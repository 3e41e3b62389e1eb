//! Database entities.

pub mod block;
pub mod distributed_poll;
pub mod poll;
pub mod question;
pub mod response;
pub mod user;
pub mod vote;

pub use block::Entity as Block;
pub use distributed_poll::Entity as DistributedPoll;
pub use poll::Entity as Poll;
pub use question::Entity as Question;
pub use response::Entity as Response;
pub use user::Entity as User;
pub use vote::Entity as Vote;
