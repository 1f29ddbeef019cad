// src/driver/canvas.rs
use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::pixelcolor::Rgb888;

/// 可能提供 2D 绘制能力的显示表面
///
/// `context_2d` 返回 `None` 表示该表面不支持 2D 绘制，
/// 对应的时钟实例不会被初始化。
pub trait Canvas {
    type Target: DrawTarget<Color = Rgb888>;

    fn context_2d(&mut self) -> Option<&mut Self::Target>;
}

/// 尚未绑定实际表面的槽位
impl<C: Canvas> Canvas for Option<C> {
    type Target = C::Target;

    fn context_2d(&mut self) -> Option<&mut Self::Target> {
        self.as_mut().and_then(|canvas| canvas.context_2d())
    }
}
