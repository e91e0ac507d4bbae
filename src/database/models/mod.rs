pub mod gym;
pub mod gym_class;
pub mod member;
pub mod member_entry;
pub mod payment;
pub mod trainer;
pub mod user;

pub use gym::Gym;
pub use gym_class::GymClass;
pub use member::Member;
pub use member_entry::MemberEntry;
pub use payment::Payment;
pub use trainer::Trainer;
pub use user::User;
