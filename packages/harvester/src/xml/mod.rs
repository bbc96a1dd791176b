//! XML navigation helpers.

mod utils;

pub use utils::{
    child_text, element_children, elements_at_depth, find_child, find_children, get_tag_name,
    get_text,
};
