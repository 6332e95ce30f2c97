//! Typed page accessors
//!
//! `Site::get("news", args)` works for any registered page. Test suites that
//! want one method per page wrap a `Site` in their own type and generate the
//! methods with `page_accessors!`:
//!
//! ```ignore
//! struct Blog {
//!     site: Site,
//! }
//!
//! impl AsRef<Site> for Blog {
//!     fn as_ref(&self) -> &Site {
//!         &self.site
//!     }
//! }
//!
//! page_accessors!(Blog {
//!     home / is_home,
//!     article / is_article,
//! });
//!
//! let article = blog.article(json!({ "slug": "hello" })).await?;
//! assert!(blog.is_article().await?);
//! ```

/// Generate an accessor and an is-displayed predicate for each named page
#[macro_export]
macro_rules! page_accessors {
    ($site:ty { $($page:ident / $displayed:ident),+ $(,)? }) => {
        impl $site {
            $(
                pub async fn $page<A: Into<$crate::page::PageArgs>>(
                    &self,
                    args: A,
                ) -> $crate::Result<$crate::page::PageInstance> {
                    <Self as AsRef<$crate::site::Site>>::as_ref(self)
                        .get(stringify!($page), args)
                        .await
                }

                pub async fn $displayed(&self) -> $crate::Result<bool> {
                    <Self as AsRef<$crate::site::Site>>::as_ref(self)
                        .is_displayed(stringify!($page))
                        .await
                }
            )+
        }
    };
}
