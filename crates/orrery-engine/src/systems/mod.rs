pub mod belt;
pub mod highlight;
pub mod labels;
pub mod pick;
pub mod render;
