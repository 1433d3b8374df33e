// Length of a BD_ADDR on the wire
pub const BD_ADDR_LEN: usize = 6;
