// Domain layer: trainer records, the column table, cell typing and the ports the pipeline runs on.

pub mod cell;
pub mod columns;
pub mod model;
pub mod ports;
