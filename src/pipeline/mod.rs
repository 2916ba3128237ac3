pub mod stage1_load;
pub mod stage2_normalize;
pub mod stage3_panel;
pub mod stage4_classify;
pub mod stage5_report;

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/fixture.rs"]
pub(crate) mod fixture;
