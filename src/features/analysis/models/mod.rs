mod label_mapper;

pub use label_mapper::categorize;
