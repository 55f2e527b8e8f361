//! State management module.
//!
//! Contains the Matrix (shared server state) and the roster entities.

mod follower;
mod locks;
mod matrix;
mod session;
mod user;

pub use follower::{Follower, FollowerRecord, Subscription};
pub use locks::AddressLocks;
pub use matrix::{Matrix, MatrixParams, ServerInfo};
pub use session::{Session, SessionRegistry};
pub use user::{User, UserRecord};
