use super::ClassMetadata;

/// Hook invoked once per class, after its metadata is assembled and before
/// it is cached.
///
/// Only skip flags can be changed: [`ClassMetadata`] and
/// [`PropertyMetadata`](super::PropertyMetadata) expose no structural mutation.
/// A property skipped in both directions is removed afterwards.
///
/// # Examples
///
/// ```
/// use vc_json::metadata::{ClassMetadata, ClassMetadataVisitor};
///
/// struct ReadOnlyIds;
///
/// impl ClassMetadataVisitor for ReadOnlyIds {
///     fn on_loaded(&self, metadata: &mut ClassMetadata) {
///         for property in metadata.properties_mut().iter_mut() {
///             if property.name() == "id" {
///                 property.set_skip_deserialize(true);
///             }
///         }
///     }
/// }
/// ```
pub trait ClassMetadataVisitor: Send + Sync {
    fn on_loaded(&self, metadata: &mut ClassMetadata);
}
