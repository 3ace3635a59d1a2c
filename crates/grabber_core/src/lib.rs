//! Grabber core: pure version, keyword and naming policy shared by the pipeline.
mod keywords;
mod naming;
mod target;
mod version;

pub use keywords::{KeywordMatcher, DEFAULT_ROW_KEYWORDS};
pub use naming::{
    artifact_file_name, extension_from_url, is_package_extension, mirror_release_path, slugify,
    split_extension, with_extension, PACKAGE_EXTENSIONS,
};
pub use target::{AppTarget, Source};
pub use version::{
    all_older_than, compare_versions, extract_version_token, first_eligible_version, is_older,
    is_prerelease, VERSION_PATTERN,
};
