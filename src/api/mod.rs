pub mod block_image;

pub use block_image::{handle_block_image, BlockImageQuery, __path_handle_block_image};
