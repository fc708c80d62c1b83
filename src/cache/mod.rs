//! 对象缓存
//!
//! 后端以插件形式注册（moka 内存缓存、redis），启动时按 `cache.type` 选择。

pub mod object_cache;
pub mod register;
mod traits;

pub use traits::{CacheResult, ObjectCache};

/// 为缓存后端生成 `register()` 函数，将构造器登记到插件表
///
/// 后端类型需要提供 `fn new() -> Result<Self, String>`。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $ty:ty) => {
        pub fn register() {
            let constructor: $crate::cache::register::ObjectCacheConstructor =
                std::sync::Arc::new(|| -> $crate::cache::register::BoxedObjectCacheFuture {
                    Box::pin(async {
                        let cache = <$ty>::new()
                            .map_err($crate::errors::PeerEvalError::cache_connection)?;
                        Ok::<_, $crate::errors::PeerEvalError>(
                            Box::new(cache) as Box<dyn $crate::cache::ObjectCache>
                        )
                    })
                });
            $crate::cache::register::register_object_cache_plugin($name, constructor);
        }
    };
}
