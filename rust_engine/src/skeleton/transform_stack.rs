//! 变换栈

use glam::Mat4;

/// 组合变换栈
///
/// 栈底固定为单位矩阵。`push(m)` 压入 `top * m`，因此栈顶始终等于
/// 从根到当前节点路径上所有局部变换的乘积。
#[derive(Clone, Debug)]
pub struct TransformStack {
    stack: Vec<Mat4>,
}

impl TransformStack {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// 按树深度预分配
    pub fn with_capacity(depth: usize) -> Self {
        let mut stack = Vec::with_capacity(depth + 1);
        stack.push(Mat4::IDENTITY);
        Self { stack }
    }

    /// 组合并压入：新栈顶 = 当前栈顶 * local
    pub fn push(&mut self, local: Mat4) {
        let composed = self.top() * local;
        self.stack.push(composed);
    }

    /// 弹出最近压入的组合变换，栈底单位矩阵不会被弹出
    pub fn pop(&mut self) -> Option<Mat4> {
        if self.stack.len() > 1 {
            self.stack.pop()
        } else {
            None
        }
    }

    /// 当前组合变换
    pub fn top(&self) -> Mat4 {
        self.stack.last().copied().unwrap_or(Mat4::IDENTITY)
    }

    /// 已压入的层数（不含栈底）
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// 弹出直到只剩 `depth` 层
    pub fn truncate(&mut self, depth: usize) {
        self.stack.truncate(depth + 1);
    }

    pub fn clear(&mut self) {
        self.truncate(0);
    }
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}
