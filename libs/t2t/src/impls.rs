//! `Transferable` for std types.

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

use crate::error::TransferError;
use crate::kind::Kind;
use crate::value::{
    ArraySlot, KeyShape, MapSlot, MapView, Number, NumberSlot, RefSlot, SeqSlot, SeqView, Slot, Transferable, View,
};

// ════════════════════════════════════════════════════════════════
//  Scalars
// ════════════════════════════════════════════════════════════════

impl Transferable for bool {
    fn view(&self) -> View<'_> {
        View::Bool(*self)
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Bool(self)
    }

    fn is_zero(&self) -> bool {
        !*self
    }
}

impl Transferable for String {
    fn view(&self) -> View<'_> {
        View::Str(self)
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Str(self)
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

macro_rules! number_impl {
    ($($ty:ty => $variant:ident, $zero:expr;)*) => {
        $(
            impl Transferable for $ty {
                fn view(&self) -> View<'_> {
                    View::Number(Number::$variant(*self))
                }

                fn slot(&mut self) -> Slot<'_> {
                    Slot::Number(NumberSlot::$variant(self))
                }

                fn is_zero(&self) -> bool {
                    *self == $zero
                }
            }
        )*
    };
}

number_impl! {
    i8 => I8, 0;
    i16 => I16, 0;
    i32 => I32, 0;
    i64 => I64, 0;
    isize => Isize, 0;
    u8 => U8, 0;
    u16 => U16, 0;
    u32 => U32, 0;
    u64 => U64, 0;
    usize => Usize, 0;
    f32 => F32, 0.0;
    f64 => F64, 0.0;
}

// ════════════════════════════════════════════════════════════════
//  Sequences
// ════════════════════════════════════════════════════════════════

impl<T: Transferable + Default> Transferable for Vec<T> {
    fn view(&self) -> View<'_> {
        View::Seq(self)
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Seq(self)
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Transferable> SeqView for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, index: usize) -> Option<&dyn Transferable> {
        self.as_slice().get(index).map(|v| v as &dyn Transferable)
    }
}

impl<T: Transferable + Default> SeqSlot for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn resize(&mut self, len: usize) {
        self.resize_with(len, T::default);
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Transferable> {
        self.as_mut_slice().get_mut(index).map(|v| v as &mut dyn Transferable)
    }
}

impl<T: Transferable + Default, const N: usize> Transferable for [T; N] {
    fn view(&self) -> View<'_> {
        View::Array(self)
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Array(self)
    }

    fn is_zero(&self) -> bool {
        self.iter().all(Transferable::is_zero)
    }
}

impl<T: Transferable, const N: usize> SeqView for [T; N] {
    fn len(&self) -> usize {
        N
    }

    fn get(&self, index: usize) -> Option<&dyn Transferable> {
        self.as_slice().get(index).map(|v| v as &dyn Transferable)
    }
}

impl<T: Transferable + Default, const N: usize> ArraySlot for [T; N] {
    fn len(&self) -> usize {
        N
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Transferable> {
        self.as_mut_slice().get_mut(index).map(|v| v as &mut dyn Transferable)
    }

    fn reset(&mut self, index: usize) {
        if let Some(v) = self.as_mut_slice().get_mut(index) {
            *v = T::default();
        }
    }
}

// ════════════════════════════════════════════════════════════════
//  Maps
// ════════════════════════════════════════════════════════════════

fn key_kind_of<K: Transferable + Default>() -> Kind {
    K::default().slot().kind()
}

impl<K, V, S> Transferable for HashMap<K, V, S>
where
    K: Transferable + Default + Eq + Hash,
    V: Transferable + Default,
    S: BuildHasher,
{
    fn view(&self) -> View<'_> {
        View::Map(self)
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Map(self)
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V, S> MapView for HashMap<K, V, S>
where
    K: Transferable + Default,
    V: Transferable,
{
    fn key_shape(&self) -> KeyShape {
        KeyShape::of::<K>()
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&dyn Transferable, &dyn Transferable)> + '_> {
        Box::new(self.iter().map(|(k, v)| (k as &dyn Transferable, v as &dyn Transferable)))
    }
}

impl<K, V, S> MapSlot for HashMap<K, V, S>
where
    K: Transferable + Default + Eq + Hash,
    V: Transferable + Default,
    S: BuildHasher,
{
    fn key_kind(&self) -> Kind {
        key_kind_of::<K>()
    }

    fn key_type(&self) -> &'static str {
        std::any::type_name::<K>()
    }

    fn insert_with(
        &mut self,
        fill: &mut dyn FnMut(&mut dyn Transferable, &mut dyn Transferable) -> Result<(), TransferError>,
    ) -> Result<(), TransferError> {
        let mut key = K::default();
        let mut value = V::default();
        fill(&mut key, &mut value)?;
        self.insert(key, value);
        Ok(())
    }
}

impl<K, V> Transferable for BTreeMap<K, V>
where
    K: Transferable + Default + Ord,
    V: Transferable + Default,
{
    fn view(&self) -> View<'_> {
        View::Map(self)
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Map(self)
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V> MapView for BTreeMap<K, V>
where
    K: Transferable + Default,
    V: Transferable,
{
    fn key_shape(&self) -> KeyShape {
        KeyShape::of::<K>()
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&dyn Transferable, &dyn Transferable)> + '_> {
        Box::new(self.iter().map(|(k, v)| (k as &dyn Transferable, v as &dyn Transferable)))
    }
}

impl<K, V> MapSlot for BTreeMap<K, V>
where
    K: Transferable + Default + Ord,
    V: Transferable + Default,
{
    fn key_kind(&self) -> Kind {
        key_kind_of::<K>()
    }

    fn key_type(&self) -> &'static str {
        std::any::type_name::<K>()
    }

    fn insert_with(
        &mut self,
        fill: &mut dyn FnMut(&mut dyn Transferable, &mut dyn Transferable) -> Result<(), TransferError>,
    ) -> Result<(), TransferError> {
        let mut key = K::default();
        let mut value = V::default();
        fill(&mut key, &mut value)?;
        self.insert(key, value);
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════
//  References
// ════════════════════════════════════════════════════════════════

impl<T: Transferable + Default> Transferable for Option<T> {
    fn view(&self) -> View<'_> {
        View::Ref(self.as_ref().map(|v| v as &dyn Transferable))
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Ref(self)
    }

    fn is_zero(&self) -> bool {
        self.is_none()
    }
}

impl<T: Transferable + Default> RefSlot for Option<T> {
    fn target(&mut self) -> Result<&mut dyn Transferable, TransferError> {
        Ok(self.get_or_insert_with(T::default))
    }
}

impl<T: Transferable> Transferable for Box<T> {
    fn view(&self) -> View<'_> {
        View::Ref(Some(&**self))
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Ref(self)
    }

    fn is_zero(&self) -> bool {
        false
    }
}

impl<T: Transferable> RefSlot for Box<T> {
    fn target(&mut self) -> Result<&mut dyn Transferable, TransferError> {
        Ok(&mut **self)
    }
}

impl<T: Transferable> Transferable for Arc<T> {
    fn view(&self) -> View<'_> {
        View::Ref(Some(&**self))
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Ref(self)
    }

    fn is_zero(&self) -> bool {
        false
    }
}

impl<T: Transferable> RefSlot for Arc<T> {
    /// Fails while the `Arc` is shared.
    fn target(&mut self) -> Result<&mut dyn Transferable, TransferError> {
        match Arc::get_mut(self) {
            Some(inner) => Ok(inner),
            None => Err(TransferError::InvalidOutput {
                type_name: std::any::type_name::<Self>(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_kinds() {
        assert_eq!(true.kind(), Kind::Bool);
        assert_eq!(String::new().kind(), Kind::String);
        assert_eq!(3u16.kind(), Kind::U16);
        assert_eq!(1.5f32.kind(), Kind::F32);
    }

    #[test]
    fn composite_kinds() {
        assert_eq!(vec![1i32].kind(), Kind::Seq);
        assert_eq!([0u8; 4].kind(), Kind::Array);
        assert_eq!(HashMap::<String, i64>::new().kind(), Kind::Map);
        assert_eq!(Some(1i64).kind(), Kind::Ref);
        assert_eq!(Box::new(1i64).kind(), Kind::Ref);
    }

    #[test]
    fn zero_values() {
        assert!(0i64.is_zero());
        assert!(0.0f64.is_zero());
        assert!(Vec::<i64>::new().is_zero());
        assert!([0i64; 3].is_zero());
        assert!(![0i64, 1, 0].is_zero());
        assert!(None::<i64>.is_zero());
        assert!(!Some(0i64).is_zero());
    }

    #[test]
    fn seq_slot_resizes_with_defaults() {
        let mut v = vec![1i64, 2, 3];
        SeqSlot::resize(&mut v, 5);
        assert_eq!(v, vec![1, 2, 3, 0, 0]);
        SeqSlot::resize(&mut v, 1);
        assert_eq!(v, vec![1]);
    }

    #[test]
    fn array_reset() {
        let mut a = [5i64, 6, 7];
        a.reset(1);
        assert_eq!(a, [5, 0, 7]);
        a.reset(9);
    }

    #[test]
    fn map_key_kind_comes_from_key_type() {
        assert_eq!(HashMap::<String, i64>::new().key_kind(), Kind::String);
        assert_eq!(BTreeMap::<u8, i64>::new().key_kind(), Kind::U8);
    }

    #[test]
    fn key_shape_is_known_for_empty_maps() {
        let shape = MapView::key_shape(&HashMap::<bool, i64>::new());
        assert_eq!(shape.kind, Kind::Bool);
        assert!(!shape.text);
        assert_eq!(MapView::key_shape(&BTreeMap::<u32, i64>::new()).kind, Kind::U32);
    }

    #[test]
    fn option_target_allocates_default() {
        let mut slot: Option<i64> = None;
        assert!(slot.target().is_ok());
        assert_eq!(slot, Some(0));
    }

    #[test]
    fn shared_arc_is_not_writable() {
        let mut a = Arc::new(1i64);
        let other = Arc::clone(&a);
        assert!(matches!(a.target(), Err(TransferError::InvalidOutput { .. })));
        drop(other);
        assert!(a.target().is_ok());
    }
}
