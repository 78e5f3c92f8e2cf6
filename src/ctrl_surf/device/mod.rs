mod xtouch_mini;
pub use xtouch_mini::XTouchMini;
