pub mod jisilu;
