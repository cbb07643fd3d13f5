// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
pub mod animation;
pub mod images;

pub use animation::Animator;
pub use images::{ImageGroup, RadarSatellite, RadarService};
