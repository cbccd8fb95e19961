mod vcf;

pub use vcf::{parse_phone_numbers, VcfContactsProvider};
