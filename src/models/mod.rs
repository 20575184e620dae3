pub mod category;
pub mod customer;
pub mod item;
pub mod item_categories;
pub mod order;
pub mod order_line;
