//! Repository layer over the database.

pub mod block;
pub mod distributed_poll;
pub mod poll;
pub mod question;
pub mod response;
pub mod user;
pub mod vote;

pub use block::BlockRepository;
pub use distributed_poll::DistributedPollRepository;
pub use poll::PollRepository;
pub use question::QuestionRepository;
pub use response::ResponseRepository;
pub use user::UserRepository;
pub use vote::VoteRepository;
