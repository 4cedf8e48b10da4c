pub mod artist;
pub mod cart;
pub mod concert;
pub mod seat;

pub use artist::{Artist, Concert, Coordinates};
pub use cart::{AddToCartRequest, CartItem, FavoriteAction};
pub use concert::ConcertSelection;
pub use seat::SeatCategory;
