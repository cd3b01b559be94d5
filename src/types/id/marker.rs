use crate::internal::Sealed;

macro_rules! markers {
  { $( $ident:ident, )* } => {$(
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct $ident;
    impl Sealed for $ident {}
    impl Marker for $ident {}
  )*};
}

markers! {
  AnyMarker,
  PersonMarker,
  SurveyMarker,
}

/// Restricts the generic parameter of [`Id`](super::Id) to the marker
/// types declared in this module.
pub trait Marker: Sealed {}
