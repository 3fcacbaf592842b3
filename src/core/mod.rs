pub mod candle;
pub mod history;
pub mod primitives;
pub mod scale;
pub mod types;

pub use candle::Candle;
pub use history::{CandleHistory, HistorySource, HistorySubscription, HistoryUpdate, ListenerId};
pub use scale::LinearScale;
pub use types::{Point, Rect, Viewport};
