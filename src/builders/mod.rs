mod select;

pub use select::{Order, Select, SelectWithColumns, SelectWithTable};
