// FAT family: variant-neutral structures plus the FAT16 decoder

pub mod common;
pub mod fat16;
