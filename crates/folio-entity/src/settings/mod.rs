//! Process-wide singleton configuration records.

pub mod about;
pub mod contact;
pub mod singleton;
pub mod system;

pub use about::AboutContent;
pub use contact::ContactSetting;
pub use singleton::{Singleton, SingletonEntity};
pub use system::{SystemInfo, SystemSetting};
