pub mod post;
pub mod review;
pub mod room;
pub mod stay;
pub mod user;

pub use post::{NewPost, PostChanges, PostStatus, RoommatePost};
pub use review::{NewReview, Review, ReviewChanges};
pub use room::{NewRoom, RoomChanges, RoomType, StayRoom};
pub use stay::{NewStay, Stay, StayChanges};
pub use user::{NewUser, Role, SignupRefresh, User, UserChanges};
