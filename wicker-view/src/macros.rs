/// Declare a concrete typed view.
///
/// Generates a struct holding only its backing handle, a [`NodeView`]
/// implementation, and one getter/setter pair per declared field. Field kinds
/// are `text`, `integer`, `float`, `boolean`, `node` (raw handle), or the
/// name of another view declared with this macro (nested typed access).
///
/// ```
/// use wicker_view::{NodeView, typed_view};
/// use wicker_node::NodeArena;
///
/// typed_view! {
///     pub struct AddressView {
///         street: text,
///     }
/// }
///
/// typed_view! {
///     pub struct PersonView {
///         name: text,
///         age: integer,
///         address: AddressView,
///     }
/// }
///
/// let mut arena = NodeArena::new();
/// let mut person = PersonView::new(&mut arena);
/// person.set_name(&mut arena, Some("ada"));
/// assert_eq!(person.name(&arena), Some("ada"));
/// ```
///
/// [`NodeView`]: crate::NodeView
#[macro_export]
macro_rules! typed_view {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($(#[$fmeta:meta])* $field:ident : $kind:tt),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, PartialEq, Eq)]
        $vis struct $name {
            backing: $crate::__private::NodeId,
        }

        impl $crate::NodeView for $name {
            const TYPE_NAME: &'static str = stringify!($name);

            fn bind(backing: $crate::__private::NodeId) -> Self {
                Self { backing }
            }

            fn backing(&self) -> $crate::__private::NodeId {
                self.backing
            }

            fn rebind(&mut self, backing: $crate::__private::NodeId) {
                self.backing = backing;
            }
        }

        impl $name {
            $($crate::typed_view!(@accessor $(#[$fmeta])* $field : $kind);)*
        }
    };

    (@accessor $(#[$fmeta:meta])* $field:ident : text) => {
        $crate::__private::paste! {
            $(#[$fmeta])*
            pub fn $field<'a>(&self, arena: &'a $crate::__private::NodeArena) -> Option<&'a str> {
                $crate::NodeView::get_or_null(self, arena, stringify!($field))
                    .and_then(|id| arena.node(id).as_text())
            }

            #[doc = concat!("Write `", stringify!($field), "`, storing null for `None`.")]
            pub fn [<set_ $field>](
                &mut self,
                arena: &mut $crate::__private::NodeArena,
                value: Option<&str>,
            ) {
                let id = value.map(|v| arena.text(v));
                $crate::NodeView::put_or_null(self, arena, stringify!($field), id);
            }
        }
    };

    (@accessor $(#[$fmeta:meta])* $field:ident : integer) => {
        $crate::__private::paste! {
            $(#[$fmeta])*
            pub fn $field(&self, arena: &$crate::__private::NodeArena) -> Option<i64> {
                $crate::NodeView::get_or_null(self, arena, stringify!($field))
                    .and_then(|id| arena.node(id).as_integer())
            }

            #[doc = concat!("Write `", stringify!($field), "`, storing null for `None`.")]
            pub fn [<set_ $field>](
                &mut self,
                arena: &mut $crate::__private::NodeArena,
                value: Option<i64>,
            ) {
                let id = value.map(|v| arena.integer(v));
                $crate::NodeView::put_or_null(self, arena, stringify!($field), id);
            }
        }
    };

    (@accessor $(#[$fmeta:meta])* $field:ident : float) => {
        $crate::__private::paste! {
            $(#[$fmeta])*
            pub fn $field(&self, arena: &$crate::__private::NodeArena) -> Option<f64> {
                $crate::NodeView::get_or_null(self, arena, stringify!($field))
                    .and_then(|id| arena.node(id).as_float())
            }

            #[doc = concat!("Write `", stringify!($field), "`, storing null for `None`.")]
            pub fn [<set_ $field>](
                &mut self,
                arena: &mut $crate::__private::NodeArena,
                value: Option<f64>,
            ) {
                let id = value.map(|v| arena.float(v));
                $crate::NodeView::put_or_null(self, arena, stringify!($field), id);
            }
        }
    };

    (@accessor $(#[$fmeta:meta])* $field:ident : boolean) => {
        $crate::__private::paste! {
            $(#[$fmeta])*
            pub fn $field(&self, arena: &$crate::__private::NodeArena) -> Option<bool> {
                $crate::NodeView::get_or_null(self, arena, stringify!($field))
                    .and_then(|id| arena.node(id).as_bool())
            }

            #[doc = concat!("Write `", stringify!($field), "`, storing null for `None`.")]
            pub fn [<set_ $field>](
                &mut self,
                arena: &mut $crate::__private::NodeArena,
                value: Option<bool>,
            ) {
                let id = value.map(|v| arena.boolean(v));
                $crate::NodeView::put_or_null(self, arena, stringify!($field), id);
            }
        }
    };

    (@accessor $(#[$fmeta:meta])* $field:ident : node) => {
        $crate::__private::paste! {
            $(#[$fmeta])*
            pub fn $field(&self, arena: &$crate::__private::NodeArena) -> $crate::__private::NodeId {
                $crate::NodeView::get(self, arena, stringify!($field))
            }

            #[doc = concat!("Write `", stringify!($field), "`, storing null for `None`.")]
            pub fn [<set_ $field>](
                &mut self,
                arena: &mut $crate::__private::NodeArena,
                value: Option<$crate::__private::NodeId>,
            ) {
                $crate::NodeView::put_or_null(self, arena, stringify!($field), value);
            }
        }
    };

    (@accessor $(#[$fmeta:meta])* $field:ident : $view:ident) => {
        $crate::__private::paste! {
            $(#[$fmeta])*
            pub fn $field<'v>(
                &self,
                arena: &$crate::__private::NodeArena,
                target: &'v mut $view,
            ) -> $crate::__private::WickerResult<Option<&'v mut $view>> {
                $crate::NodeView::get_typed(self, arena, stringify!($field), target)
            }

            #[doc = concat!("Store `", stringify!($field), "`'s backing node, or null for `None`.")]
            pub fn [<set_ $field>](
                &mut self,
                arena: &mut $crate::__private::NodeArena,
                value: Option<&$view>,
            ) {
                $crate::NodeView::put_typed(self, arena, stringify!($field), value);
            }
        }
    };
}
