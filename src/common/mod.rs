pub mod bounded_map;
