// One module per upstream. Each maps its payload to RawRecords; none of them
// know about sections, caps or the scan pipeline.

pub mod aiid;
pub mod feed;
